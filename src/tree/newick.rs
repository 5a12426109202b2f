//! 简单的 Newick 输出（仅写出，不解析）

use std::fmt::Write as _;

/// 二叉/多叉树节点，按 arena 下标引用子节点
#[derive(Debug, Clone)]
pub struct Node {
    pub label: Option<String>,
    pub branch_length: Option<f64>,
    pub children: Vec<usize>,
}

impl Node {
    pub fn leaf(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            branch_length: None,
            children: Vec::new(),
        }
    }

    pub fn internal(children: Vec<usize>) -> Self {
        Self {
            label: None,
            branch_length: None,
            children,
        }
    }
}

fn needs_quoting(label: &str) -> bool {
    label.chars().any(|ch| {
        ch.is_whitespace() || matches!(ch, ':' | ',' | '(' | ')' | ';' | '[' | ']' | '\'')
    })
}

fn write_label(out: &mut String, label: &str) {
    if !needs_quoting(label) {
        out.push_str(label);
        return;
    }
    out.push('\'');
    for ch in label.chars() {
        if ch == '\'' {
            out.push_str("''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
}

/// 从 `root` 开始写出整棵树，以 `;\n` 结尾
pub fn to_newick(nodes: &[Node], root: usize) -> String {
    let mut s = String::new();
    write_subtree(nodes, root, &mut s);
    s.push_str(";\n");
    s
}

fn write_subtree(nodes: &[Node], idx: usize, out: &mut String) {
    let node = &nodes[idx];
    if !node.children.is_empty() {
        out.push('(');
        for (i, &child) in node.children.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_subtree(nodes, child, out);
            if let Some(bl) = nodes[child].branch_length {
                let _ = write!(out, ":{:.6}", bl);
            }
        }
        out.push(')');
    }
    if let Some(label) = &node.label {
        write_label(out, label);
    }
}

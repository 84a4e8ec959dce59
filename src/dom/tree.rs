use crate::dom::element::{ChildNode, ElementNode};
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

/// Positional path addressing an element inside a [`PageDom`]
///
/// Each step is the index of the element among its parent's element children
/// (text runs are not counted). The empty path addresses the document root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path of the document root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from explicit steps
    pub fn from_steps(steps: Vec<usize>) -> Self {
        Self(steps)
    }

    /// Path of the i-th element child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    /// Path of the parent, or None at the root
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Index of this node among its parent's element children
    pub fn sibling_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn steps(&self) -> &[usize] {
        &self.0
    }

    /// True when this path addresses `other` or one of its ancestors
    pub fn contains(&self, other: &NodePath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// Proper ancestors from the immediate parent up to (excluding) the root
    pub fn ancestors(&self) -> impl Iterator<Item = NodePath> + '_ {
        (1..self.0.len()).rev().map(|len| NodePath(self.0[..len].to_vec()))
    }
}

/// The parsed page tree, rooted at the `html` element
#[derive(Debug, Clone, PartialEq)]
pub struct PageDom {
    pub root: ElementNode,
}

impl PageDom {
    /// Create a PageDom from an already-built root element
    pub fn new(root: ElementNode) -> Self {
        Self { root }
    }

    /// Parse an HTML document. The parser is error-recovering, so this is
    /// total: malformed markup yields a best-effort tree, never a failure.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let root = convert_element(*document.root_element())
            .unwrap_or_else(|| ElementNode::new("html"));
        Self { root }
    }

    /// Resolve a path to its element
    pub fn get(&self, path: &NodePath) -> Option<&ElementNode> {
        let mut current = &self.root;
        for &step in path.steps() {
            current = current.child_elements().nth(step)?;
        }
        Some(current)
    }

    /// Resolve a path to a mutable element
    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut ElementNode> {
        let mut current = &mut self.root;
        for &step in path.steps() {
            current = current
                .children
                .iter_mut()
                .filter_map(|c| match c {
                    ChildNode::Element(el) => Some(el),
                    ChildNode::Text(_) => None,
                })
                .nth(step)?;
        }
        Some(current)
    }

    /// Path of the `body` element, when the document has one
    pub fn body(&self) -> Option<NodePath> {
        self.iter().find(|(_, el)| el.is_tag("body")).map(|(path, _)| path)
    }

    /// Document-order (depth-first, pre-order) traversal of every element,
    /// root included
    pub fn iter(&self) -> DomWalk<'_> {
        DomWalk {
            stack: vec![(NodePath::root(), &self.root)],
        }
    }

    /// Total number of elements in the tree
    pub fn count_elements(&self) -> usize {
        self.iter().count()
    }

    /// Path of the next element sibling, if the node has one
    pub fn next_sibling(&self, path: &NodePath) -> Option<NodePath> {
        let parent = path.parent()?;
        let index = path.sibling_index()?;
        let candidate = parent.child(index + 1);
        self.get(&candidate).map(|_| candidate)
    }
}

/// Iterator over `(NodePath, &ElementNode)` in document order
pub struct DomWalk<'a> {
    stack: Vec<(NodePath, &'a ElementNode)>,
}

impl<'a> Iterator for DomWalk<'a> {
    type Item = (NodePath, &'a ElementNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, el) = self.stack.pop()?;
        let children: Vec<_> = el.child_elements().collect();
        for (i, child) in children.into_iter().enumerate().rev() {
            self.stack.push((path.child(i), child));
        }
        Some((path, el))
    }
}

fn convert_element(node: NodeRef<'_, Node>) -> Option<ElementNode> {
    let element = match node.value() {
        Node::Element(el) => el,
        _ => return None,
    };

    let mut out = ElementNode::new(element.name());
    for (key, value) in element.attrs() {
        out.attributes.insert(key.to_string(), value.to_string());
    }
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                out.children.push(ChildNode::Text(text.text.to_string()));
            }
            Node::Element(_) => {
                if let Some(el) = convert_element(child) {
                    out.children.push(ChildNode::Element(el));
                }
            }
            _ => {}
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PageDom {
        PageDom::parse(
            "<html><body>\
             <div id=\"a\"><p>one</p><p>two</p></div>\
             <div id=\"b\">tail</div>\
             </body></html>",
        )
    }

    #[test]
    fn test_parse_builds_tree() {
        let dom = sample();
        assert!(dom.root.is_tag("html"));

        let body = dom.body().expect("body");
        let body_el = dom.get(&body).expect("body element");
        assert_eq!(body_el.child_elements().count(), 2);
    }

    #[test]
    fn test_get_by_path() {
        let dom = sample();
        let body = dom.body().unwrap();

        let second_p = body.child(0).child(1);
        let el = dom.get(&second_p).expect("p");
        assert!(el.is_tag("p"));
        assert_eq!(el.subtree_text(), "two");

        assert!(dom.get(&body.child(5)).is_none());
    }

    #[test]
    fn test_document_order_iteration() {
        let dom = sample();
        let tags: Vec<_> = dom.iter().map(|(_, el)| el.tag_name.clone()).collect();
        // head is synthesized by the HTML5 parser
        assert_eq!(tags, vec!["html", "head", "body", "div", "p", "p", "div"]);
    }

    #[test]
    fn test_path_relationships() {
        let body = NodePath::from_steps(vec![1]);
        let inner = body.child(0).child(1);

        assert!(body.contains(&inner));
        assert!(body.contains(&body));
        assert!(!inner.contains(&body));

        let ancestors: Vec<_> = inner.ancestors().collect();
        assert_eq!(
            ancestors,
            vec![NodePath::from_steps(vec![1, 0]), NodePath::from_steps(vec![1])]
        );
        assert_eq!(inner.parent(), Some(NodePath::from_steps(vec![1, 0])));
        assert_eq!(NodePath::root().parent(), None);
    }

    #[test]
    fn test_next_sibling() {
        let dom = sample();
        let body = dom.body().unwrap();
        let first_div = body.child(0);

        let sibling = dom.next_sibling(&first_div).expect("sibling");
        assert_eq!(sibling, body.child(1));
        assert_eq!(dom.get(&sibling).unwrap().id(), Some("b"));

        assert!(dom.next_sibling(&sibling).is_none());
    }

    #[test]
    fn test_parse_is_error_recovering() {
        let dom = PageDom::parse("<div><p>unclosed");
        assert!(dom.root.is_tag("html"));
        assert!(dom.body().is_some());
    }

    #[test]
    fn test_get_mut() {
        let mut dom = sample();
        let body = dom.body().unwrap();
        let target = body.child(1);

        dom.get_mut(&target)
            .expect("div")
            .attributes
            .insert("style".to_string(), "outline: 1px".to_string());

        assert_eq!(dom.get(&target).unwrap().attr("style"), Some("outline: 1px"));
    }
}

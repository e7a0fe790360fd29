//! Namespaced element path lookups.
//!
//! A small subset of ElementTree path syntax:
//!
//! - `A/B/C` walks direct children.
//! - `.//A` or `A//B` searches every descendant for the next step.
//!
//! Every step matches on `(namespace, local name)`. Results come back in
//! document order. A step with no match ends the walk with nothing found.
//!
//! [`FieldPath::find`] follows only the first match of each step, the way
//! chained `find` calls do. [`FieldPath::find_all`] keeps every candidate.

use std::collections::HashSet;

use roxmltree::{Node, NodeId};

/// How a step relates to the nodes matched by the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Direct children only.
    Child,
    /// Any descendant, excluding the context node itself.
    Descendant,
}

/// One path step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    pub axis: Axis,
    pub name: &'a str,
}

impl Step<'_> {
    fn matches(&self, node: &Node<'_, '_>, namespace: &str) -> bool {
        node.is_element() && node.has_tag_name((namespace, self.name))
    }

    /// First element this step selects beneath `context`.
    fn first<'t, 'input>(&self, context: Node<'t, 'input>, namespace: &str) -> Option<Node<'t, 'input>> {
        match self.axis {
            Axis::Child => context.children().find(|n| self.matches(n, namespace)),
            Axis::Descendant => context
                .descendants()
                .skip(1)
                .find(|n| self.matches(n, namespace)),
        }
    }
}

/// A parsed element path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath<'a> {
    steps: Vec<Step<'a>>,
}

impl<'a> FieldPath<'a> {
    /// Parse a path expression.
    pub fn parse(expr: &'a str) -> Self {
        let mut steps = Vec::new();
        let mut axis = Axis::Child;

        for (i, segment) in expr.split('/').enumerate() {
            match segment {
                // A leading '/' is just a separator; any later empty segment
                // comes from '//'.
                "" if i > 0 => axis = Axis::Descendant,
                "" | "." => {}
                name => {
                    steps.push(Step { axis, name });
                    axis = Axis::Child;
                }
            }
        }

        Self { steps }
    }

    /// The parsed steps.
    pub fn steps(&self) -> &[Step<'a>] {
        &self.steps
    }

    /// Whether the path has no steps (it would select nothing).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every element the path selects beneath `context`, in document order.
    pub fn find_all<'t, 'input>(
        &self,
        context: Node<'t, 'input>,
        namespace: &str,
    ) -> Vec<Node<'t, 'input>> {
        if self.steps.is_empty() {
            return Vec::new();
        }

        let mut current = vec![context];
        for step in &self.steps {
            let mut seen: HashSet<NodeId> = HashSet::new();
            let mut next = Vec::new();

            for node in &current {
                let is_match = |n: &Node<'t, 'input>| step.matches(n, namespace);
                let mut keep = |candidate: Node<'t, 'input>| {
                    if seen.insert(candidate.id()) {
                        next.push(candidate);
                    }
                };
                match step.axis {
                    Axis::Child => node.children().filter(is_match).for_each(&mut keep),
                    Axis::Descendant => {
                        node.descendants().skip(1).filter(is_match).for_each(&mut keep)
                    }
                }
            }

            if next.is_empty() {
                return next;
            }
            current = next;
        }

        current
    }

    /// Element reached by taking the first match at every step.
    ///
    /// `Fa/P_2` looks for `P_2` in the first `Fa` only. Each step stops
    /// scanning as soon as it finds a match.
    pub fn find<'t, 'input>(
        &self,
        context: Node<'t, 'input>,
        namespace: &str,
    ) -> Option<Node<'t, 'input>> {
        let (last, init) = self.steps.split_last()?;
        let mut node = context;
        for step in init {
            node = step.first(node, namespace)?;
        }
        last.first(node, namespace)
    }

    /// Leading text of the found element.
    ///
    /// An element without leading text (`<P_2/>`) yields `None`, the same as a
    /// missing element. Text is returned exactly as written in the document.
    pub fn text(&self, context: Node<'_, '_>, namespace: &str) -> Option<String> {
        self.find(context, namespace).and_then(leading_text)
    }
}

/// Text before the element's first child element.
///
/// Comments and processing instructions are dropped, and the text around
/// them is joined: `<a>AB<!-- c -->CD</a>` reads as `ABCD`.
fn leading_text(node: Node<'_, '_>) -> Option<String> {
    let mut text: Option<String> = None;
    for child in node.children() {
        if child.is_element() {
            break;
        }
        if child.is_text() {
            if let Some(chunk) = child.text() {
                text.get_or_insert_with(String::new).push_str(chunk);
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    const NS: &str = "urn:test";

    fn names(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| n.text().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_parse_steps() {
        let path = FieldPath::parse("Adres/KodKraju");
        assert_eq!(
            path.steps(),
            &[
                Step { axis: Axis::Child, name: "Adres" },
                Step { axis: Axis::Child, name: "KodKraju" },
            ]
        );

        let path = FieldPath::parse(".//FaWiersz");
        assert_eq!(path.steps(), &[Step { axis: Axis::Descendant, name: "FaWiersz" }]);

        let path = FieldPath::parse("Fa//P_7");
        assert_eq!(path.steps()[1], Step { axis: Axis::Descendant, name: "P_7" });

        assert!(FieldPath::parse("").is_empty());
    }

    #[test]
    fn test_child_path_requires_namespace() {
        let xml = r#"<r xmlns="urn:test"><a><b>1</b></a></r>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(FieldPath::parse("a/b").text(root, NS), Some("1".to_string()));
        assert_eq!(FieldPath::parse("a/b").text(root, "urn:other"), None);
    }

    #[test]
    fn test_missing_intermediate_is_none() {
        let xml = r#"<r xmlns="urn:test"><a/></r>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(FieldPath::parse("x/y/z").text(root, NS), None);
        assert_eq!(FieldPath::parse("a/b").text(root, NS), None);
    }

    #[test]
    fn test_child_path_does_not_descend() {
        let xml = r#"<r xmlns="urn:test"><a><b><c>deep</c></b></a></r>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert!(FieldPath::parse("c").find(root, NS).is_none());
        assert_eq!(FieldPath::parse(".//c").text(root, NS), Some("deep".to_string()));
    }

    #[test]
    fn test_find_follows_first_candidate() {
        // The first <a> has no <b>; `find` does not move on to the second.
        let xml = r#"<r xmlns="urn:test"><a/><a><b>second</b></a></r>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(FieldPath::parse("a/b").text(root, NS), None);
        assert_eq!(names(&FieldPath::parse("a/b").find_all(root, NS)), vec!["second"]);
    }

    #[test]
    fn test_find_first_of_many_siblings() {
        let xml = r#"<r xmlns="urn:test"><w>1</w><w>2</w><g><w>3</w></g></r>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(FieldPath::parse("w").text(root, NS).as_deref(), Some("1"));
        assert_eq!(FieldPath::parse("g//w").text(root, NS).as_deref(), Some("3"));
        assert_eq!(FieldPath::parse(".//w").text(root, NS).as_deref(), Some("1"));
    }

    #[test]
    fn test_text_skips_comments() {
        let xml = r#"<r xmlns="urn:test">
            <Nazwa>ACME<!-- c -->Sp. z o.o.</Nazwa>
            <NIP><!--x-->1234567890</NIP>
            <P><?pi data?>tail</P>
            <Only><!-- nothing else --></Only>
        </r>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(FieldPath::parse("Nazwa").text(root, NS).as_deref(), Some("ACMESp. z o.o."));
        assert_eq!(FieldPath::parse("NIP").text(root, NS).as_deref(), Some("1234567890"));
        assert_eq!(FieldPath::parse("P").text(root, NS).as_deref(), Some("tail"));
        assert_eq!(FieldPath::parse("Only").text(root, NS), None);
    }

    #[test]
    fn test_text_stops_at_child_element() {
        let xml = r#"<r xmlns="urn:test"><a>head<!-- c -->more<b>inner</b>tail</a></r>"#;
        let doc = Document::parse(xml).unwrap();

        assert_eq!(FieldPath::parse("a").text(doc.root_element(), NS).as_deref(), Some("headmore"));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let xml = r#"<r xmlns="urn:test">
            <w>1</w>
            <g><w>2</w><h><w>3</w></h></g>
            <w>4</w>
        </r>"#;
        let doc = Document::parse(xml).unwrap();
        let found = FieldPath::parse(".//w").find_all(doc.root_element(), NS);

        assert_eq!(names(&found), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_descendant_excludes_context() {
        let xml = r#"<w xmlns="urn:test"><w>inner</w></w>"#;
        let doc = Document::parse(xml).unwrap();
        let found = FieldPath::parse(".//w").find_all(doc.root_element(), NS);

        assert_eq!(names(&found), vec!["inner"]);
    }

    #[test]
    fn test_nested_descendants_not_duplicated() {
        let xml = r#"<r xmlns="urn:test"><a><a><b>x</b></a></a></r>"#;
        let doc = Document::parse(xml).unwrap();
        let found = FieldPath::parse(".//a//b").find_all(doc.root_element(), NS);

        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_empty_element_text_is_none() {
        let xml = r#"<r xmlns="urn:test"><P_2/><P_6></P_6></r>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert!(FieldPath::parse("P_2").find(root, NS).is_some());
        assert_eq!(FieldPath::parse("P_2").text(root, NS), None);
        assert_eq!(FieldPath::parse("P_6").text(root, NS), None);
    }

    #[test]
    fn test_text_verbatim() {
        let xml = r#"<r xmlns="urn:test"><P_9A>1234,56</P_9A><P_6>2024-01-15</P_6><N> a &amp; b </N></r>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(FieldPath::parse("P_9A").text(root, NS).as_deref(), Some("1234,56"));
        assert_eq!(FieldPath::parse("P_6").text(root, NS).as_deref(), Some("2024-01-15"));
        assert_eq!(FieldPath::parse("N").text(root, NS).as_deref(), Some(" a & b "));
    }

    #[test]
    fn test_prefixed_namespace() {
        let xml = r#"<tns:r xmlns:tns="urn:test"><tns:a>p</tns:a></tns:r>"#;
        let doc = Document::parse(xml).unwrap();

        assert_eq!(FieldPath::parse("a").text(doc.root_element(), NS).as_deref(), Some("p"));
    }
}

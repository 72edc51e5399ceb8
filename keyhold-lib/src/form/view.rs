/// Described layout of a form screen, borrowed from the screen's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View<'a, F> {
    pub title: &'static str,
    pub nodes: Vec<Node<'a, F>>,
    /// Supplementary lines shown beneath the form
    pub footer: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a, F> {
    TextField {
        field: F,
        label: &'static str,
        placeholder: &'static str,
        value: &'a str,
        secure: bool,
        focused: bool,
    },
    Selector {
        label: &'static str,
        options: Vec<String>,
        selected: usize,
    },
    /// Live feedback on a field that doesn't block editing
    Hint { field: F, message: String },
    /// The reason the last submission was rejected
    Error { field: F, message: String },
}

impl<'a, F: Copy + Eq> View<'a, F> {
    pub fn text_field(&self, field: F) -> Option<&Node<'a, F>> {
        self.nodes
            .iter()
            .find(|node| matches!(node, Node::TextField { field: f, .. } if *f == field))
    }

    pub fn error(&self) -> Option<&str> {
        self.nodes.iter().find_map(|node| match node {
            Node::Error { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn hint(&self) -> Option<&str> {
        self.nodes.iter().find_map(|node| match node {
            Node::Hint { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }
}

//! What a render hands to the hooks: which application is rendering, the
//! active template, the document head being assembled and, once rendered,
//! the response body.

use std::borrow::Cow;
use std::fmt;

/// Which side of the site is rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Application {
    #[default]
    Site,
    Administrator,
}

/// A stylesheet link queued for the document head
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub href: String,
}

/// Head assets queued during render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    stylesheets: Vec<Stylesheet>,
    scripts: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a stylesheet, ignoring one already queued under the same URL
    pub fn add_stylesheet(&mut self, href: impl Into<String>) {
        let href = href.into();
        if !self.stylesheets.iter().any(|s| s.href == href) {
            self.stylesheets.push(Stylesheet { href });
        }
    }

    /// Queue a script, ignoring one already queued under the same URL
    pub fn add_script(&mut self, src: impl Into<String>) {
        let src = src.into();
        if !self.scripts.contains(&src) {
            self.scripts.push(src);
        }
    }

    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.stylesheets
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Head markup for the queued assets, stylesheets before scripts
    pub fn render_head(&self) -> String {
        let mut html = String::new();
        for sheet in &self.stylesheets {
            html.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\" type=\"text/css\" />\n",
                escape_attr(&sheet.href)
            ));
        }
        for src in &self.scripts {
            html.push_str(&format!(
                "<script src=\"{}\" type=\"text/javascript\"></script>\n",
                escape_attr(src)
            ));
        }
        html
    }
}

/// Escape a value for a double-quoted HTML attribute
fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageLevel::Error => write!(f, "error"),
        }
    }
}

/// A message shown to whoever views the rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

/// Messages queued during one render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQueue {
    messages: Vec<Message>,
}

impl MessageQueue {
    pub fn enqueue(&mut self, level: MessageLevel, text: impl Into<String>) {
        self.messages.push(Message {
            level,
            text: text.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// State shared by the hooks of one page render
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub application: Application,
    /// Name of the template rendering this page, if any
    pub template: Option<String>,
    pub document: Document,
    /// Rendered response body, filled in before `on_after_render`
    pub body: String,
    pub messages: MessageQueue,
}

impl RenderContext {
    pub fn site(template: impl Into<String>) -> Self {
        Self {
            application: Application::Site,
            template: Some(template.into()),
            ..Default::default()
        }
    }

    pub fn administrator() -> Self {
        Self {
            application: Application::Administrator,
            ..Default::default()
        }
    }

    /// Splice the queued head assets in before `</head>`, or in front of the
    /// body when it has no head
    pub fn inject_head(&mut self) {
        let head = self.document.render_head();
        if head.is_empty() {
            return;
        }
        match self.body.find("</head>") {
            Some(at) => self.body.insert_str(at, &head),
            None => self.body.insert_str(0, &head),
        }
    }
}

//! Element locators and their resolution inside the page
//!
//! A locator resolves to an ordered list of elements; single-element
//! operations act on the first match. Resolution runs as JavaScript in the
//! tab, so every locator renders to a JS expression yielding an array.

use std::fmt;

/// Accessible roles the page objects address elements by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Button,
    Link,
    Heading,
    Textbox,
    Img,
}

impl AriaRole {
    fn css(&self) -> &'static str {
        match self {
            Self::Button => "button, [role=button], input[type=submit], input[type=button]",
            Self::Link => "a[href], [role=link]",
            Self::Heading => "h1, h2, h3, h4, h5, h6, [role=heading]",
            Self::Textbox => {
                "input:not([type]), input[type=text], input[type=email], input[type=password], \
                 input[type=search], textarea, [role=textbox]"
            }
            Self::Img => "img, [role=img]",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Link => "link",
            Self::Heading => "heading",
            Self::Textbox => "textbox",
            Self::Img => "img",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Plain CSS selector
    Css(String),
    /// `data-testid` attribute
    TestId(String),
    /// Innermost elements whose visible text equals / contains `text`
    Text { text: String, exact: bool },
    /// Elements matching `css` whose visible text equals / contains `text`
    CssText { css: String, text: String, exact: bool },
    /// Elements with `role` whose accessible name equals / contains `name`
    Role { role: AriaRole, name: String, exact: bool },
    /// `child` resolved inside the first match of `parent`
    Within(Box<Locator>, Box<Locator>),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            exact: false,
        }
    }

    pub fn exact_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssText {
            css: css.into(),
            text: text.into(),
            exact: true,
        }
    }

    pub fn role(role: AriaRole, name: impl Into<String>) -> Self {
        Self::Role {
            role,
            name: name.into(),
            exact: true,
        }
    }

    pub fn within(self, child: Locator) -> Self {
        Self::Within(Box::new(self), Box::new(child))
    }

    /// JS expression evaluating to an array of matching elements under `root`
    fn to_js(&self, root: &str) -> String {
        match self {
            Self::Css(css) => format!("Array.from({}.querySelectorAll({}))", root, js_str(css)),
            Self::TestId(id) => format!(
                "Array.from({}.querySelectorAll({}))",
                root,
                js_str(&format!("[data-testid=\"{}\"]", id))
            ),
            Self::Text { text, exact } => format!(
                "__loc.byText({}, null, {}, {})",
                root,
                js_str(text),
                exact
            ),
            Self::CssText { css, text, exact } => format!(
                "__loc.byText({}, {}, {}, {})",
                root,
                js_str(css),
                js_str(text),
                exact
            ),
            Self::Role { role, name, exact } => format!(
                "__loc.byRole({}, {}, {}, {})",
                root,
                js_str(role.css()),
                js_str(name),
                exact
            ),
            Self::Within(parent, child) => {
                // Distinct name per nesting level so inner scopes never shadow
                let scope = format!("{}_p", root);
                format!(
                    "(() => {{ const {s} = {}[0]; return {s} ? {} : []; }})()",
                    parent.to_js(root),
                    child.to_js(&scope),
                    s = scope
                )
            }
        }
    }

    /// Complete script: resolves the locator and hands the matches to `body`
    ///
    /// `body` is a JS function expression taking the element array.
    pub fn script(&self, body: &str) -> String {
        format!(
            "(() => {{ {} const els = {}; return ({})(els); }})()",
            JS_PRELUDE,
            self.to_js("document"),
            body
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css={}", css),
            Self::TestId(id) => write!(f, "testid={}", id),
            Self::Text { text, exact } => write!(f, "text{}{:?}", if *exact { "=" } else { "~" }, text),
            Self::CssText { css, text, exact } => {
                write!(f, "{}:text{}{:?}", css, if *exact { "=" } else { "~" }, text)
            }
            Self::Role { role, name, exact } => {
                write!(f, "role={}[name{}{:?}]", role.name(), if *exact { "=" } else { "~" }, name)
            }
            Self::Within(parent, child) => write!(f, "{} >> {}", parent, child),
        }
    }
}

/// Quote a Rust string as a JS string literal
fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Helpers every locator script can use
const JS_PRELUDE: &str = r#"
const __loc = {
  norm(s) { return (s || '').replace(/\s+/g, ' ').trim(); },
  matches(actual, wanted, exact) {
    const a = __loc.norm(actual);
    return exact ? a === wanted : a.includes(wanted);
  },
  byText(root, sel, text, exact) {
    const all = Array.from(root.querySelectorAll(sel || '*'));
    const hits = all.filter(el => __loc.matches(el.innerText, text, exact));
    if (sel) return hits;
    return hits.filter(el => !hits.some(other => other !== el && el.contains(other)));
  },
  accName(el) {
    const label = el.getAttribute('aria-label');
    if (label) return label;
    const by = el.getAttribute('aria-labelledby');
    if (by) {
      const ref = document.getElementById(by);
      if (ref) return ref.innerText;
    }
    if (el.labels && el.labels.length) return el.labels[0].innerText;
    if (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA') {
      return el.getAttribute('placeholder') || el.value || '';
    }
    if (el.tagName === 'IMG') return el.getAttribute('alt') || '';
    return el.innerText;
  },
  byRole(root, sel, name, exact) {
    return Array.from(root.querySelectorAll(sel))
      .filter(el => __loc.matches(__loc.accName(el), name, exact));
  },
  visible(el) {
    if (!el || !el.isConnected) return false;
    const style = window.getComputedStyle(el);
    if (style.visibility === 'hidden' || style.display === 'none') return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
  },
};
"#;

//! Applying the boundary's cursor to the host surface.

use std::{fmt, rc::Rc};

use rustc_hash::FxHashMap;

use crate::system::HostSurface;

/// How a cursor mode is shown on the host.
#[derive(Clone)]
pub enum CursorStyle {
    /// A CSS cursor value, set on the surface.
    Css(String),
    /// Called with the mode name; the callback does the work itself.
    Callback(Rc<dyn Fn(&str)>),
    /// Style properties applied to the surface.
    Style(Vec<(String, String)>),
}

impl fmt::Debug for CursorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorStyle::Css(css) => f.debug_tuple("Css").field(css).finish(),
            CursorStyle::Callback(_) => f.write_str("Callback(..)"),
            CursorStyle::Style(props) => f.debug_tuple("Style").field(props).finish(),
        }
    }
}

impl From<&str> for CursorStyle {
    fn from(css: &str) -> Self {
        CursorStyle::Css(css.to_owned())
    }
}

impl From<String> for CursorStyle {
    fn from(css: String) -> Self {
        CursorStyle::Css(css)
    }
}

/// Cursor modes and the cursor currently applied.
#[derive(Debug, Clone)]
pub struct CursorStyles {
    styles: FxHashMap<String, CursorStyle>,
    current: Option<String>,
}

impl Default for CursorStyles {
    fn default() -> Self {
        let mut styles = FxHashMap::default();
        styles.insert("default".to_owned(), CursorStyle::from("inherit"));
        styles.insert("pointer".to_owned(), CursorStyle::from("pointer"));
        Self {
            styles,
            current: None,
        }
    }
}

impl CursorStyles {
    pub fn insert(&mut self, mode: impl Into<String>, style: impl Into<CursorStyle>) {
        self.styles.insert(mode.into(), style.into());
    }

    pub fn remove(&mut self, mode: &str) -> Option<CursorStyle> {
        self.styles.remove(mode)
    }

    pub fn get(&self, mode: &str) -> Option<&CursorStyle> {
        self.styles.get(mode)
    }

    /// The mode last applied, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Show `mode` on `surface`, or `"default"` when no mode is requested.
    ///
    /// Nothing happens when the mode is already showing. Modes without a
    /// registered style are set on the surface as raw CSS cursor values.
    pub fn apply(&mut self, mode: Option<&str>, surface: &mut impl HostSurface) {
        let mode = mode.unwrap_or("default");
        if self.current.as_deref() == Some(mode) {
            return;
        }
        self.current = Some(mode.to_owned());
        let styles_allowed = surface.supports_styles();

        match self.styles.get(mode) {
            Some(CursorStyle::Css(css)) => {
                if styles_allowed {
                    surface.set_cursor(css);
                }
            }
            Some(CursorStyle::Callback(callback)) => callback(mode),
            Some(CursorStyle::Style(props)) => {
                if styles_allowed {
                    for (property, value) in props {
                        surface.apply_style(property, value);
                    }
                }
            }
            None => {
                if styles_allowed {
                    surface.set_cursor(mode);
                }
            }
        }
    }
}

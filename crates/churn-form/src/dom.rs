//! Handles onto the host page.
//!
//! The handler never looks elements up on its own; it is given these handles
//! once and keeps them. `FormPage` is the in-memory page used by the binary
//! and by tests.

use anyhow::Context;
use churn_protocol::config::FormValues;
use churn_protocol::{
    FIELD_IDS, FLAG_CODES, GENDER, GENDER_CODES, GEOGRAPHY, GEOGRAPHY_CODES, HAS_CR_CARD,
    IS_ACTIVE_MEMBER,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub trait FormFields: Send + Sync {
    /// Raw value of the input with this id, `None` when it has no value.
    fn field_value(&self, id: &str) -> Option<String>;
}

pub trait SubmitControl: Send + Sync {
    fn set_disabled(&self, disabled: bool);
    fn set_label(&self, label: &str);
    fn is_disabled(&self) -> bool;
    fn label(&self) -> String;
}

pub trait ResultRegion: Send + Sync {
    /// Replaces everything currently shown.
    fn set_html(&self, html: String);
    fn html(&self) -> String;
}

#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone)]
enum Element {
    Text(String),
    Select {
        options: &'static [&'static str],
        selected: Option<String>,
    },
}

impl Element {
    fn select(options: &'static [&'static str]) -> Self {
        Element::Select {
            options,
            selected: options.first().map(|option| option.to_string()),
        }
    }

    fn value(&self) -> Option<String> {
        match self {
            Element::Text(text) => Some(text.clone()),
            Element::Select { selected, .. } => selected.clone(),
        }
    }

    fn assign(&mut self, value: &str) {
        match self {
            Element::Text(text) => *text = value.to_string(),
            Element::Select { options, selected } => {
                *selected = options
                    .iter()
                    .find(|option| **option == value)
                    .map(|option| option.to_string());
            }
        }
    }
}

#[derive(Debug)]
struct PageState {
    fields: BTreeMap<&'static str, Element>,
    button_disabled: bool,
    button_label: String,
    result_html: String,
}

#[derive(Debug)]
pub struct FormPage {
    state: Mutex<PageState>,
}

impl FormPage {
    /// A churn form with every input present, empty text boxes and each
    /// select on its first option.
    pub fn new(idle_label: &str) -> Self {
        let fields = FIELD_IDS
            .iter()
            .map(|id| {
                let element = match *id {
                    GEOGRAPHY => Element::select(&GEOGRAPHY_CODES),
                    GENDER => Element::select(&GENDER_CODES),
                    HAS_CR_CARD | IS_ACTIVE_MEMBER => Element::select(&FLAG_CODES),
                    _ => Element::Text(String::new()),
                };
                (*id, element)
            })
            .collect();
        Self {
            state: Mutex::new(PageState {
                fields,
                button_disabled: false,
                button_label: idle_label.to_string(),
                result_html: String::new(),
            }),
        }
    }

    pub fn with_values(idle_label: &str, values: &FormValues) -> anyhow::Result<Self> {
        let page = Self::new(idle_label);
        for (id, value) in &values.fields {
            page.set_value(id, value)?;
        }
        Ok(page)
    }

    pub fn load(idle_label: &str, path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read form values {}", path.display()))?;
        let values: FormValues = toml::from_str(&raw)
            .with_context(|| format!("failed to parse form values {}", path.display()))?;
        Self::with_values(idle_label, &values)
    }

    /// Types into a text input or picks a select option. A select given a
    /// value outside its options ends up with no value.
    pub fn set_value(&self, id: &str, value: &str) -> anyhow::Result<()> {
        let mut state = self.lock();
        let element = state
            .fields
            .get_mut(id)
            .with_context(|| format!("form has no element {id}"))?;
        element.assign(value);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FormFields for FormPage {
    fn field_value(&self, id: &str) -> Option<String> {
        self.lock().fields.get(id).and_then(Element::value)
    }
}

impl SubmitControl for FormPage {
    fn set_disabled(&self, disabled: bool) {
        self.lock().button_disabled = disabled;
    }

    fn set_label(&self, label: &str) {
        self.lock().button_label = label.to_string();
    }

    fn is_disabled(&self) -> bool {
        self.lock().button_disabled
    }

    fn label(&self) -> String {
        self.lock().button_label.clone()
    }
}

impl ResultRegion for FormPage {
    fn set_html(&self, html: String) {
        self.lock().result_html = html;
    }

    fn html(&self) -> String {
        self.lock().result_html.clone()
    }
}

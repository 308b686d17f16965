//! Templates for the local-service sessions.
//!
//! `Local Shell` and `Local Serial` are never stored. Loading one yields the
//! defaults with the template's values layered on top.
use crate::kernel::constants::{LOCAL_SERIAL, LOCAL_SHELL};
use crate::settings::conf::{Conf, ConfValue};

#[derive(Debug, Clone, Copy)]
enum TemplateValue {
    Int(i32),
    Str(&'static str),
}

struct Template {
    name: &'static str,
    values: &'static [(&'static str, TemplateValue)],
}

static TEMPLATES: &[Template] = &[
    Template {
        name: LOCAL_SHELL,
        values: &[
            ("Protocol", TemplateValue::Str("local")),
            ("HostName", TemplateValue::Str("")),
            ("PortNumber", TemplateValue::Int(0)),
            ("CloseOnExit", TemplateValue::Int(2)),
            ("WarnOnClose", TemplateValue::Int(0)),
            ("WinTitle", TemplateValue::Str(LOCAL_SHELL)),
        ],
    },
    Template {
        name: LOCAL_SERIAL,
        values: &[
            ("Protocol", TemplateValue::Str("serial")),
            ("HostName", TemplateValue::Str("")),
            ("PortNumber", TemplateValue::Int(0)),
            ("SerialSpeed", TemplateValue::Int(115200)),
            ("SerialFlowControl", TemplateValue::Int(0)),
            ("LocalEcho", TemplateValue::Int(1)),
            ("WinTitle", TemplateValue::Str(LOCAL_SERIAL)),
        ],
    },
];

/// Layer the template for `name` over `conf`. Returns false when `name` has
/// no template.
pub fn apply_template(name: &str, conf: &mut Conf) -> bool {
    let Some(template) = TEMPLATES.iter().find(|t| t.name == name) else {
        return false;
    };
    for (key, value) in template.values {
        let value = match *value {
            TemplateValue::Int(v) => ConfValue::Int(v),
            TemplateValue::Str(s) => ConfValue::Str(s.to_string()),
        };
        conf.set(*key, value);
    }
    true
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal placeholder templates for the channel and episode XML.
//!
//! `{{name}}` inserts the value of `name` with the XML special characters
//! escaped. `{{{name}}}` inserts it verbatim, for fields that already hold
//! rendered markup (category lists, optional elements).

mod defaults;

use std::collections::BTreeMap;

use quick_xml::escape::escape;

use crate::error::TemplateError;

pub use defaults::{CHANNEL_TEMPLATE, EPISODE_TEMPLATE};

/// Field values a template is rendered against
pub type Fields = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Escaped(String),
    Raw(String),
}

/// A parsed template, ready to be rendered any number of times
#[derive(Debug, Clone)]
pub struct Template {
    name: &'static str,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source. Fails on an unterminated placeholder.
    pub fn parse(name: &'static str, source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }

            let after_open = &rest[open..];
            let (raw, opener, closer) = if after_open.starts_with("{{{") {
                (true, 3, "}}}")
            } else {
                (false, 2, "}}")
            };

            let body = &after_open[opener..];
            let close = body.find(closer).ok_or(TemplateError::Unterminated {
                offset: offset + open,
            })?;

            let field = body[..close].trim().to_string();
            segments.push(if raw {
                Segment::Raw(field)
            } else {
                Segment::Escaped(field)
            });

            let consumed = open + opener + close + closer.len();
            offset += consumed;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { name, segments })
    }

    /// Name used in log output
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Render against `fields`. Every referenced field must be present.
    pub fn render(&self, fields: &Fields) -> Result<String, TemplateError> {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Escaped(name) => {
                    let value = lookup(fields, name)?;
                    out.push_str(&escape(value));
                }
                Segment::Raw(name) => out.push_str(lookup(fields, name)?),
            }
        }

        Ok(out)
    }
}

fn lookup<'a>(fields: &'a Fields, name: &str) -> Result<&'a String, TemplateError> {
    fields.get(name).ok_or_else(|| TemplateError::UnknownField {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&'static str, &str)]) -> Fields {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn renders_plain_placeholders() {
        let template = Template::parse("t", "<title>{{title}}</title>").unwrap();
        let out = template.render(&fields(&[("title", "Paper Reviews")])).unwrap();
        assert_eq!(out, "<title>Paper Reviews</title>");
    }

    #[test]
    fn escapes_markup_in_values() {
        let template = Template::parse("t", r#"<a href="{{url}}">{{text}}</a>"#).unwrap();
        let out = template
            .render(&fields(&[
                ("url", "https://example.com/?a=1&b=\"2\""),
                ("text", "Tom & <Jerry>"),
            ]))
            .unwrap();

        assert_eq!(
            out,
            r#"<a href="https://example.com/?a=1&amp;b=&quot;2&quot;">Tom &amp; &lt;Jerry&gt;</a>"#
        );
    }

    #[test]
    fn triple_braces_insert_verbatim() {
        let template = Template::parse("t", "<channel>{{{items}}}</channel>").unwrap();
        let out = template.render(&fields(&[("items", "<item/>")])).unwrap();
        assert_eq!(out, "<channel><item/></channel>");
    }

    #[test]
    fn whitespace_inside_braces_is_ignored() {
        let template = Template::parse("t", "{{ title }}").unwrap();
        let out = template.render(&fields(&[("title", "x")])).unwrap();
        assert_eq!(out, "x");
    }

    #[test]
    fn unknown_field_is_an_error() {
        let template = Template::parse("t", "{{missing}}").unwrap();
        let err = template.render(&Fields::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownField {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = Template::parse("t", "abc {{title").unwrap_err();
        assert_eq!(err, TemplateError::Unterminated { offset: 4 });
    }

    #[test]
    fn default_templates_parse() {
        assert!(Template::parse("channel", CHANNEL_TEMPLATE).is_ok());
        assert!(Template::parse("episode", EPISODE_TEMPLATE).is_ok());
    }
}

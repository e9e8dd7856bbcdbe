use crate::generator::naming::identifiers::is_identifier;

/// Renders a JavaScript double-quoted string literal.
#[must_use]
pub(crate) fn js_string(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\u{2028}' => out.push_str("\\u2028"),
      '\u{2029}' => out.push_str("\\u2029"),
      c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
      c => out.push(c),
    }
  }
  out.push('"');
  out
}

/// A property key as written in an object type or literal.
#[must_use]
pub(crate) fn property_key(name: &str) -> String {
  if is_identifier(name) {
    name.to_string()
  } else {
    js_string(name)
  }
}

/// Builds `/** ... */` lines for a description and deprecation marker, each
/// prefixed with `indent`. Nothing to say yields no lines.
#[must_use]
pub(crate) fn doc_comment_lines(description: Option<&str>, deprecated: bool, indent: &str) -> Vec<String> {
  let mut body: Vec<String> = description
    .map(|text| text.trim().replace("*/", "*\\/"))
    .filter(|text| !text.is_empty())
    .map(|text| text.lines().map(|line| line.trim_end().to_string()).collect())
    .unwrap_or_default();
  if deprecated {
    body.push("@deprecated".to_string());
  }

  match body.as_slice() {
    [] => vec![],
    [single] => vec![format!("{indent}/** {single} */")],
    lines => {
      let mut out = Vec::with_capacity(lines.len() + 2);
      out.push(format!("{indent}/**"));
      out.extend(lines.iter().map(|line| {
        if line.is_empty() {
          format!("{indent} *")
        } else {
          format!("{indent} * {line}")
        }
      }));
      out.push(format!("{indent} */"));
      out
    }
  }
}

/// Prefixes every line with `// `, leaving blank lines as a bare `//`.
#[must_use]
pub(crate) fn line_comment(text: &str) -> String {
  text
    .lines()
    .map(|line| {
      if line.trim().is_empty() {
        "//".to_string()
      } else {
        format!("// {}", line.trim_end())
      }
    })
    .collect::<Vec<_>>()
    .join("\n")
}

use crate::form::FormData;
use crate::BindError;

/// Parses an url-encoded body, then appends the values of the request's query string.
///
/// Body values come before query values of the same key.
pub(crate) fn parse_urlencoded(body: &[u8], query: Option<&str>) -> Result<FormData, BindError> {
    let mut form = FormData::new();

    check_syntax(body)?;
    for (key, value) in form_urlencoded::parse(body) {
        form.push_value(key, value);
    }

    if let Some(query) = query {
        check_syntax(query.as_bytes())?;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            form.push_value(key, value);
        }
    }

    Ok(form)
}

/// `form_urlencoded` decodes leniently, reject what a strict query parser would not accept.
fn check_syntax(input: &[u8]) -> Result<(), BindError> {
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b';' => return Err(BindError::form_parse("invalid semicolon separator")),
            b'%' => {
                let escape = &input[i..input.len().min(i + 3)];
                if !matches!(escape, [_, hi, lo] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()) {
                    return Err(BindError::form_parse(format!(
                        "invalid URL escape {:?}",
                        String::from_utf8_lossy(escape)
                    )));
                }
                i += 3;
            }
            _ => i += 1,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_in_order() {
        let form = parse_urlencoded(b"a=1&b=hello+world&a=2&c=%2Fx", None).unwrap();

        assert_eq!(form.values("a"), Some(&["1".to_owned(), "2".to_owned()][..]));
        assert_eq!(form.values("b"), Some(&["hello world".to_owned()][..]));
        assert_eq!(form.values("c"), Some(&["/x".to_owned()][..]));
    }

    #[test]
    fn value_split_on_first_equal_sign() {
        let form = parse_urlencoded(b"int64=uint=&flag", None).unwrap();

        assert_eq!(form.values("int64"), Some(&["uint=".to_owned()][..]));
        assert_eq!(form.values("flag"), Some(&[String::new()][..]));
    }

    #[test]
    fn query_values_follow_body_values() {
        let form = parse_urlencoded(b"a=body", Some("a=query&q=1")).unwrap();

        assert_eq!(form.values("a"), Some(&["body".to_owned(), "query".to_owned()][..]));
        assert_eq!(form.values("q"), Some(&["1".to_owned()][..]));
    }

    #[test]
    fn empty_body_is_empty_form() {
        let form = parse_urlencoded(b"", None).unwrap();
        assert!(form.is_empty());
    }

    #[test]
    fn rejects_bad_escape() {
        for body in [&b"a=%zz"[..], b"a=%4", b"a=%"] {
            let err = parse_urlencoded(body, None).unwrap_err();
            assert!(matches!(err, BindError::FormParse { .. }), "{err}");
        }

        let err = parse_urlencoded(b"a=1", Some("b=%g1")).unwrap_err();
        assert_eq!(err.to_string(), r#"invalid form body: invalid URL escape "%g1""#);
    }

    #[test]
    fn rejects_semicolon_separator() {
        let err = parse_urlencoded(b"a=1;b=2", None).unwrap_err();
        assert!(matches!(err, BindError::FormParse { .. }));
    }
}

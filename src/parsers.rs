//! nom parsers for the subset of XML property lists found in `Info.plist` files.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alphanumeric1, char, digit1, hex_digit1, multispace1},
    combinator::{map, map_opt, value},
    error::Error,
    multi::many0,
    sequence::{delimited, preceded},
};

/// Parses an XML comment, returning its text
fn parse_comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!--"), take_until("-->"), tag("-->")).parse(input)
}

/// Skips whitespace and comments between elements
fn skip_insignificant(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((multispace1, parse_comment)))).parse(input)
}

/// For parsing up to and including the `<dict>` which opens the root of the property list
fn parse_until_root_dict(file_content: &str) -> IResult<&str, ()> {
    let (file_content, _) = take_until("<plist").parse(file_content)?;
    let (file_content, _) = (tag("<plist"), take_until(">"), tag(">")).parse(file_content)?;

    value((), preceded(skip_insignificant, tag("<dict>"))).parse(file_content)
}

/// Parses a `<key>` element, returning its unescaped name
fn parse_key_element(input: &str) -> IResult<&str, String> {
    map(
        delimited(tag("<key>"), take_until("</key>"), tag("</key>")),
        unescape_xml,
    )
    .parse(input)
}

/// Parses a `<string>` element, including the self-closing empty form
fn parse_string_element(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(tag("<string>"), take_until("</string>"), tag("</string>")),
        value("", tag("<string/>")),
    ))
    .parse(input)
}

/// Skips a single value element, e.g. `<string>…</string>`, `<true/>` or a nested `<dict>`
fn skip_value(input: &str) -> IResult<&str, ()> {
    let (input, name) = preceded(char('<'), alphanumeric1).parse(input)?;
    if let Ok((input, _)) = tag::<_, _, Error<&str>>("/>").parse(input) {
        return Ok((input, ()));
    }

    let (mut input, _) = char('>').parse(input)?;
    let closing = format!("</{name}>");

    if !matches!(name, "dict" | "array") {
        let (input, _) = (take_until(closing.as_str()), tag(closing.as_str())).parse(input)?;
        return Ok((input, ()));
    }

    // Containers hold further elements, which may themselves be containers
    loop {
        let (rest, _) = skip_insignificant(input)?;
        if let Ok((rest, _)) = tag::<_, _, Error<&str>>(closing.as_str()).parse(rest) {
            return Ok((rest, ()));
        }

        let (rest, _) = skip_value(rest)?;
        input = rest;
    }
}

/// Returns the `<string>` value of a key in the root dictionary of an XML property list.
///
/// Keys of nested dictionaries, and entries which are commented out, are not matched.
pub fn find_value_plist<'a>(file_content: &'a str, key: &str) -> IResult<&'a str, String> {
    let (mut file_content, _) = parse_until_root_dict(file_content)?;

    loop {
        let (rest, _) = skip_insignificant(file_content)?;
        let (rest, name) = parse_key_element(rest)?;
        let (rest, _) = skip_insignificant(rest)?;

        if name == key {
            let (rest, value) = parse_string_element(rest)?;
            return Ok((rest, unescape_xml(value)));
        }

        let (rest, _) = skip_value(rest)?;
        file_content = rest;
    }
}

/// Parses a predefined entity or a numeric character reference, e.g. `&amp;` or `&#38;`
fn parse_entity(input: &str) -> IResult<&str, char> {
    delimited(
        char('&'),
        alt((
            value('<', tag("lt")),
            value('>', tag("gt")),
            value('&', tag("amp")),
            value('"', tag("quot")),
            value('\'', tag("apos")),
            map_opt(
                preceded(alt((tag("#x"), tag("#X"))), hex_digit1),
                |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
            ),
            map_opt(preceded(char('#'), digit1), |dec: &str| {
                dec.parse().ok().and_then(char::from_u32)
            }),
        )),
        char(';'),
    )
    .parse(input)
}

/// Replaces entities and character references with the characters they stand for. Anything
/// which is not a valid reference is kept as it is.
pub fn unescape_xml(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find('&') {
        unescaped.push_str(&rest[..start]);
        rest = &rest[start..];

        match parse_entity(rest) {
            Ok((remaining, c)) => {
                unescaped.push(c);
                rest = remaining;
            }
            Err(_) => {
                unescaped.push('&');
                rest = &rest[1..];
            }
        }
    }

    unescaped.push_str(rest);
    unescaped
}

/// Escapes text for use inside an XML element
pub fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

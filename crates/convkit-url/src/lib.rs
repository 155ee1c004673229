//! URL encoding and inspection for convkit.
//!
//! Percent-encoding follows RFC 3986 with the character sets browsers use
//! for `encodeURIComponent` and `encodeURI`, plus the
//! `application/x-www-form-urlencoded` flavour. Unlike most decoders, a
//! stray `%` is an error here rather than being passed through.

use convkit_error::{ConvertError, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use url::Url;

/// Characters escaped by `encodeURIComponent`: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters escaped by `encodeURI`: the component set minus the
/// reserved delimiters.
const URI: &AsciiSet = &COMPONENT
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#');

/// Which characters are escaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMode {
    /// A single query value or path segment
    #[default]
    Component,
    /// A whole URI, keeping its delimiters
    Uri,
    /// HTML form encoding, space as `+`
    Form,
}

/// Percent-encode text
pub fn encode(text: &str, mode: UrlMode) -> String {
    let out: String = match mode {
        UrlMode::Component => utf8_percent_encode(text, COMPONENT).collect(),
        UrlMode::Uri => utf8_percent_encode(text, URI).collect(),
        UrlMode::Form => url::form_urlencoded::byte_serialize(text.as_bytes()).collect(),
    };
    tracing::debug!(input_len = text.len(), output_len = out.len(), ?mode, "url encode");
    out
}

/// Decode percent-encoded text.
///
/// Every `%` must start a two-digit hex escape. In form mode `+` means
/// space; elsewhere it is kept literally.
pub fn decode(encoded: &str, mode: UrlMode) -> Result<String> {
    check_escapes(encoded)?;

    let raw: Cow<'_, [u8]> = if mode == UrlMode::Form {
        Cow::Owned(
            encoded
                .bytes()
                .map(|b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(encoded.as_bytes())
    };

    let bytes: Vec<u8> = percent_decode(&raw).collect();
    let text = String::from_utf8(bytes)?;
    tracing::debug!(input_len = encoded.len(), output_len = text.len(), ?mode, "url decode");
    Ok(text)
}

fn check_escapes(encoded: &str) -> Result<()> {
    let chars: Vec<char> = encoded.chars().collect();
    for (position, c) in chars.iter().enumerate() {
        if *c != '%' {
            continue;
        }
        let well_formed = chars
            .get(position + 1..position + 3)
            .is_some_and(|digits| digits.iter().all(char::is_ascii_hexdigit));
        if !well_formed {
            return Err(ConvertError::MalformedPercent { position });
        }
    }
    Ok(())
}

/// Components of a parsed URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlParts {
    pub scheme: String,
    pub username: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub fragment: Option<String>,
}

impl fmt::Display for UrlParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scheme: {}", self.scheme)?;
        if let Some(user) = &self.username {
            writeln!(f, "username: {user}")?;
        }
        if let Some(host) = &self.host {
            writeln!(f, "host: {host}")?;
        }
        if let Some(port) = self.port {
            writeln!(f, "port: {port}")?;
        }
        write!(f, "path: {}", self.path)?;
        for (key, value) in &self.query {
            write!(f, "\nquery: {key} = {value}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "\nfragment: {fragment}")?;
        }
        Ok(())
    }
}

/// Parse an absolute URL into its parts, decoding the query string
pub fn parse(input: &str) -> Result<UrlParts> {
    let url = parse_url(input)?;
    Ok(UrlParts {
        scheme: url.scheme().to_string(),
        username: Some(url.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string),
        host: url.host_str().map(str::to_string),
        port: url.port_or_known_default(),
        path: url.path().to_string(),
        query: url.query_pairs().into_owned().collect(),
        fragment: url.fragment().map(str::to_string),
    })
}

/// Parses a URL string
pub fn parse_url(input: &str) -> Result<Url> {
    Url::parse(input.trim()).map_err(|e| ConvertError::InvalidUrl(e.to_string()))
}

/// Checks if a URL string is valid
pub fn is_valid_url(input: &str) -> bool {
    parse_url(input).is_ok()
}

/// Gets a query parameter value by name
pub fn query_param<'a>(url: &'a Url, name: &str) -> Option<Cow<'a, str>> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

/// Builds a URL from parts, encoding the path segments and query pairs
pub fn build_url(
    scheme: &str,
    host: &str,
    port: Option<u16>,
    path: &str,
    query: &[(&str, &str)],
) -> String {
    let mut url = format!("{scheme}://{host}");
    if let Some(p) = port {
        url.push_str(&format!(":{p}"));
    }
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| encode(s, UrlMode::Component))
        .collect();
    url.push('/');
    url.push_str(&segments.join("/"));
    if !query.is_empty() {
        let pairs: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k, UrlMode::Form), encode(v, UrlMode::Form)))
            .collect();
        url.push('?');
        url.push_str(&pairs.join("&"));
    }
    url
}

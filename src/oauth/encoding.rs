//! Percent-encoding, signature base strings, and parameter list parsing.
//!
//! The base string layout is bit-exact with RFC 5849 §3.4.1: any deviation produces signatures
//! the Access Token service rejects.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
// self
use crate::_prelude::*;

/// Everything outside `A-Za-z0-9-._~` is encoded.
const OAUTH_RESERVED: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Encodes `value` per OAuth rules: unreserved characters pass through, all other bytes of the
/// UTF-8 encoding become upper-case `%XX`, and space becomes `%20`.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, OAUTH_RESERVED).to_string()
}

/// Reverses [`percent_encode`]. Invalid UTF-8 sequences are replaced rather than rejected.
pub fn percent_decode(value: &str) -> String {
	percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Builds the signature base string for `http_method`, `url`, and `params`.
///
/// Query-string parameters of `url` join the parameter set, `oauth_signature` and `realm`
/// are excluded, and pairs are sorted by encoded key then encoded value so repeated keys sort
/// stably regardless of insertion order.
pub fn build_signature_base_string<K, V>(http_method: &str, url: &Url, params: &[(K, V)]) -> String
where
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut pairs = params
		.iter()
		.map(|(k, v)| (k.as_ref(), v.as_ref()))
		.filter(|(k, _)| *k != "oauth_signature" && *k != "realm")
		.map(|(k, v)| (percent_encode(k), percent_encode(v)))
		.chain(url.query_pairs().map(|(k, v)| (percent_encode(&k), percent_encode(&v))))
		.collect::<Vec<_>>();

	pairs.sort();

	let normalized_params =
		pairs.into_iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");

	format!(
		"{}&{}&{}",
		percent_encode(&http_method.to_ascii_uppercase()),
		percent_encode(&normalized_url(url)),
		percent_encode(&normalized_params)
	)
}

/// Returns `scheme://host[:port]/path` with default ports, query, and fragment stripped.
pub fn normalized_url(url: &Url) -> String {
	let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
	// `Url::port` is already `None` for the scheme's default port.
	let port = url.port().map(|port| format!(":{port}")).unwrap_or_default();

	format!("{}://{host}{port}{}", url.scheme(), url.path())
}

/// Parses an `Authorization` or `WWW-Authenticate` parameter list.
///
/// A leading scheme token (`OAuth`) is dropped, surrounding quotes are stripped, and values are
/// percent-decoded. Segments without `=` are skipped; an absent header yields an empty map.
pub fn parse_authorization_header(header_value: Option<&str>) -> BTreeMap<String, String> {
	let mut params = BTreeMap::new();
	let Some(raw) = header_value.map(str::trim).filter(|raw| !raw.is_empty()) else {
		return params;
	};
	let raw = strip_scheme(raw);

	for segment in split_unquoted_commas(raw) {
		let Some((key, value)) = segment.trim().split_once('=') else {
			continue;
		};
		let key = key.trim();

		if key.is_empty() {
			continue;
		}

		let value = value.trim();
		let value = value
			.strip_prefix('"')
			.and_then(|inner| inner.strip_suffix('"'))
			.unwrap_or(value);

		params.insert(percent_decode(key), percent_decode(value));
	}

	params
}

/// Parses an `application/x-www-form-urlencoded` body. `+` decodes to a space.
pub fn parse_url_query_string(body: &str) -> BTreeMap<String, String> {
	body.split('&')
		.filter(|pair| !pair.is_empty())
		.filter_map(|pair| {
			let (key, value) = pair.split_once('=').unwrap_or((pair, ""));

			if key.is_empty() {
				return None;
			}

			Some((form_decode(key), form_decode(value)))
		})
		.collect()
}

/// Encodes `params` as a form body using OAuth percent-encoding.
pub fn encode_form<K, V>(params: &[(K, V)]) -> String
where
	K: AsRef<str>,
	V: AsRef<str>,
{
	params
		.iter()
		.map(|(k, v)| format!("{}={}", percent_encode(k.as_ref()), percent_encode(v.as_ref())))
		.collect::<Vec<_>>()
		.join("&")
}

/// Renders an `Authorization: OAuth …` header value with the realm first.
pub fn build_authorization_header<K, V>(realm: &str, params: &[(K, V)]) -> String
where
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut out = format!("OAuth realm=\"{realm}\"");

	for (k, v) in params {
		out.push_str(", ");
		out.push_str(&percent_encode(k.as_ref()));
		out.push_str("=\"");
		out.push_str(&percent_encode(v.as_ref()));
		out.push('"');
	}

	out
}

fn form_decode(value: &str) -> String {
	percent_decode(&value.replace('+', " "))
}

fn strip_scheme(raw: &str) -> &str {
	match raw.split_once(char::is_whitespace) {
		Some((scheme, rest)) if !scheme.contains('=') && !scheme.contains(',') => rest.trim_start(),
		_ => raw,
	}
}

fn split_unquoted_commas(raw: &str) -> Vec<&str> {
	let mut segments = Vec::new();
	let mut in_quotes = false;
	let mut start = 0;

	for (idx, ch) in raw.char_indices() {
		match ch {
			'"' => in_quotes = !in_quotes,
			',' if !in_quotes => {
				segments.push(&raw[start..idx]);
				start = idx + 1;
			},
			_ => {},
		}
	}

	segments.push(&raw[start..]);

	segments
}

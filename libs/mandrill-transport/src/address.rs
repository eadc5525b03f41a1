//! Recipient address formatting.
//!
//! Mail hosts hand addresses over in several shapes: nothing at all, a
//! single string that may itself be a comma-joined list, or an array of
//! such strings. [`format_address`] normalizes all of them into an ordered
//! list of [`Address`] records, splitting `Display Name <local@domain>`
//! forms into their parts.

/// Flexible address input accepted by the transport.
///
/// `From` impls cover the common literal shapes so payloads read
/// naturally: `"Ada <ada@example.com>".into()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AddressInput {
    /// No addresses.
    #[default]
    None,
    /// A single string, possibly a comma-joined list.
    Single(String),
    /// Several strings; each element may itself be comma-joined.
    Many(Vec<String>),
}

impl AddressInput {
    /// Whether the input carries no addresses at all.
    pub fn is_none(&self) -> bool {
        matches!(self, AddressInput::None)
    }
}

impl From<&str> for AddressInput {
    fn from(value: &str) -> Self {
        AddressInput::Single(value.to_string())
    }
}

impl From<String> for AddressInput {
    fn from(value: String) -> Self {
        AddressInput::Single(value)
    }
}

impl From<Vec<String>> for AddressInput {
    fn from(values: Vec<String>) -> Self {
        AddressInput::Many(values)
    }
}

impl From<Vec<&str>> for AddressInput {
    fn from(values: Vec<&str>) -> Self {
        AddressInput::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// One parsed address. The email is always non-empty; tokens that reduce
/// to an empty address are dropped during formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Display name, when the `Name <addr>` form was used.
    pub name: Option<String>,
    /// The bare email address.
    pub email: String,
}

/// Parse flexible address input into an ordered list of addresses.
///
/// Empty input yields an empty list rather than an error, and malformed
/// or empty tokens are skipped silently. Output order matches input
/// order; nothing is deduplicated.
pub fn format_address(input: &AddressInput) -> Vec<Address> {
    match input {
        AddressInput::None => Vec::new(),
        AddressInput::Single(value) => split_tokens(value).collect(),
        AddressInput::Many(values) => values.iter().flat_map(|value| split_tokens(value)).collect(),
    }
}

fn split_tokens(value: &str) -> impl Iterator<Item = Address> + '_ {
    value.split(',').filter_map(parse_token)
}

/// Parse one trimmed token, either `Display Name <addr>` or a bare
/// address. Returns `None` when no address remains after trimming.
fn parse_token(token: &str) -> Option<Address> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if let Some(open) = token.rfind('<') {
        if let Some(close) = token[open..].rfind('>') {
            let email = token[open + 1..open + close].trim();
            if email.is_empty() {
                return None;
            }
            let name = token[..open].trim();
            return Some(Address {
                name: (!name.is_empty()).then(|| name.to_string()),
                email: email.to_string(),
            });
        }
    }

    Some(Address {
        name: None,
        email: token.to_string(),
    })
}

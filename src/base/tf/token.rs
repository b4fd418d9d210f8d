/// Token for efficient comparison, assignment, and hashing of known strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token {
	data: String,
}

impl Token {
	pub fn new(name: impl ToString) -> Self {
		Token {
			data: name.to_string(),
		}
	}

	pub fn empty() -> Self {
		Token {
			data: String::new(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn as_str(&self) -> &str {
		&self.data
	}
}

impl From<&str> for Token {
	fn from(s: &str) -> Self {
		Token::new(s)
	}
}

impl From<String> for Token {
	fn from(data: String) -> Self {
		Token { data }
	}
}

impl From<&Token> for Token {
	fn from(token: &Token) -> Self {
		token.clone()
	}
}

impl AsRef<str> for Token {
	fn as_ref(&self) -> &str {
		&self.data
	}
}

impl std::borrow::Borrow<str> for Token {
	fn borrow(&self) -> &str {
		&self.data
	}
}

impl PartialEq<str> for Token {
	fn eq(&self, other: &str) -> bool {
		self.data == other
	}
}

impl PartialEq<&str> for Token {
	fn eq(&self, other: &&str) -> bool {
		self.data == *other
	}
}

impl std::fmt::Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}", self.data)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn map_lookup_by_str() {
		let mut map = HashMap::new();
		map.insert(Token::new("Cube"), 1);
		assert_eq!(map.get("Cube"), Some(&1));
		assert!(map.contains_key("Cube"));
		assert!(!map.contains_key("cube"));
	}
}

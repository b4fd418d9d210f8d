//! Tools Foundations

mod token;

pub use token::Token;

/// Declares a struct of well-known [`Token`]s together with a lazily initialized static instance.
macro_rules! declare_public_tokens {
	($struct:ident, $static:ident, [$($name:ident: $value:expr),* $(,)?]) => {
		pub struct $struct {
			$(pub $name: $crate::base::tf::Token,)*
		}

		pub static $static: std::sync::LazyLock<$struct> = std::sync::LazyLock::new(|| {
			$struct {
				$($name: $crate::base::tf::Token::new($value),)*
			}
		});
	};
}

pub(crate) use declare_public_tokens;

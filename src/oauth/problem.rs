//! OAuth problem-reporting vocabulary carried in `oauth_problem`.

// self
use crate::_prelude::*;

macro_rules! def_problems {
	($($variant:ident => $code:literal, $doc:literal;)+) => {
		/// Standard OAuth problem codes returned by the Access Token service.
		#[derive(Clone, Debug, PartialEq, Eq, Hash)]
		pub enum OAuthProblem {
			$(
				#[doc = $doc]
				$variant,
			)+
			/// Code outside the standard vocabulary, kept verbatim.
			Other(String),
		}
		impl OAuthProblem {
			/// Maps a wire code onto the vocabulary, keeping unknown codes verbatim.
			pub fn from_code(code: &str) -> Self {
				match code {
					$($code => Self::$variant,)+
					other => Self::Other(other.to_owned()),
				}
			}

			/// Returns the wire form of the problem code.
			pub fn as_str(&self) -> &str {
				match self {
					$(Self::$variant => $code,)+
					Self::Other(code) => code,
				}
			}
		}
		impl FromStr for OAuthProblem {
			type Err = std::convert::Infallible;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Ok(Self::from_code(s))
			}
		}
	};
}

def_problems! {
	VersionRejected => "version_rejected", "The `oauth_version` is not supported.";
	ParameterAbsent => "parameter_absent", "A required parameter was not received.";
	ParameterRejected => "parameter_rejected", "An unexpected parameter was received.";
	TimestampRefused => "timestamp_refused", "The `oauth_timestamp` is outside the acceptable window.";
	NonceUsed => "nonce_used", "The `oauth_nonce` was already used.";
	SignatureMethodRejected => "signature_method_rejected", "The signature method is not supported.";
	SignatureInvalid => "signature_invalid", "The signature does not match.";
	ConsumerKeyUnknown => "consumer_key_unknown", "The consumer key is unknown.";
	ConsumerKeyRejected => "consumer_key_rejected", "The consumer key is permanently unacceptable.";
	ConsumerKeyRefused => "consumer_key_refused", "The consumer key is temporarily unacceptable.";
	TokenUsed => "token_used", "The token was already consumed.";
	TokenExpired => "token_expired", "The token has expired.";
	TokenRevoked => "token_revoked", "The token has been revoked.";
	TokenRejected => "token_rejected", "The token is not valid.";
	AdditionalAuthorizationRequired => "additional_authorization_required", "The token lacks the required authorization.";
	PermissionUnknown => "permission_unknown", "The user has not decided whether to grant access.";
	PermissionDenied => "permission_denied", "The user denied access.";
	UserRefused => "user_refused", "The user refused access.";
}

impl OAuthProblem {
	/// Name of the problem-reporting parameter that accompanies this code.
	pub fn additional_info_parameter(&self) -> &'static str {
		match self {
			Self::ParameterAbsent => "oauth_parameters_absent",
			Self::ParameterRejected => "oauth_parameters_rejected",
			Self::TimestampRefused => "oauth_acceptable_timestamps",
			Self::VersionRejected => "oauth_acceptable_versions",
			_ => "oauth_problem_advice",
		}
	}
}
impl Display for OAuthProblem {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn known_codes_round_trip() {
		for code in ["token_rejected", "token_expired", "signature_invalid", "nonce_used"] {
			let problem = code.parse::<OAuthProblem>().expect("Problem parsing is infallible.");

			assert!(!matches!(problem, OAuthProblem::Other(_)));
			assert_eq!(problem.to_string(), code);
		}
	}

	#[test]
	fn unknown_codes_are_preserved() {
		let problem = "quota_exceeded".parse::<OAuthProblem>().expect("Problem parsing is infallible.");

		assert_eq!(problem, OAuthProblem::Other("quota_exceeded".into()));
		assert_eq!(problem.as_str(), "quota_exceeded");
		assert_eq!(problem.additional_info_parameter(), "oauth_problem_advice");
	}

	#[test]
	fn companion_parameters_follow_problem_code() {
		assert_eq!(OAuthProblem::ParameterAbsent.additional_info_parameter(), "oauth_parameters_absent");
		assert_eq!(
			OAuthProblem::TimestampRefused.additional_info_parameter(),
			"oauth_acceptable_timestamps"
		);
	}
}

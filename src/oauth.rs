// OAuth 1.0a request signing (HMAC-SHA1), user context.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::AppError;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

// RFC 3986 percent-encoding, only unreserved characters pass through
pub fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

// `METHOD&enc(url)&enc(sorted params)`. `url` must be the base URL without a
// query string; query and form parameters go into `params`.
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}

pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> Result<String, AppError> {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| AppError::Internal(format!("oauth signing key rejected: {}", e)))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

// The `oauth_*` protocol parameters for one request, without the signature.
pub fn oauth_params(creds: &OAuthCredentials, nonce: &str, timestamp: i64) -> Vec<(String, String)> {
    vec![
        ("oauth_consumer_key".into(), creds.consumer_key.clone()),
        ("oauth_nonce".into(), nonce.to_string()),
        ("oauth_signature_method".into(), "HMAC-SHA1".into()),
        ("oauth_timestamp".into(), timestamp.to_string()),
        ("oauth_token".into(), creds.token.clone()),
        ("oauth_version".into(), "1.0".into()),
    ]
}

// Builds the `Authorization: OAuth ...` header value. JSON bodies are not
// part of the signature, so only the protocol parameters are signed.
pub fn authorization_header(
    creds: &OAuthCredentials,
    method: &str,
    url: &str,
    nonce: &str,
    timestamp: i64,
) -> Result<String, AppError> {
    let mut params = oauth_params(creds, nonce, timestamp);
    let base = signature_base_string(method, url, &params);
    let signature = sign(&base, &creds.consumer_secret, &creds.token_secret)?;
    params.push(("oauth_signature".into(), signature));
    params.sort();

    let fields = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {}", fields))
}

// Random nonce, 32 hex characters.
pub fn fresh_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the X developer docs ("Creating a signature")
    fn docs_creds() -> OAuthCredentials {
        OAuthCredentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".into(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".into(),
            token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".into(),
            token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".into(),
        }
    }

    fn docs_params() -> Vec<(String, String)> {
        let mut params = oauth_params(
            &docs_creds(),
            "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            1318622958,
        );
        params.push(("include_entities".into(), "true".into()));
        params.push((
            "status".into(),
            "Hello Ladies + Gentlemen, a signed OAuth request!".into(),
        ));
        params
    }

    #[test]
    fn percent_encoding_keeps_only_unreserved() {
        assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(percent_encode("!*'()"), "%21%2A%27%28%29");
    }

    #[test]
    fn base_string_matches_docs_example() {
        let base = signature_base_string(
            "post",
            "https://api.twitter.com/1.1/statuses/update.json",
            &docs_params(),
        );
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn signature_matches_docs_example() {
        let creds = docs_creds();
        let base = signature_base_string(
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &docs_params(),
        );
        assert_eq!(
            sign(&base, &creds.consumer_secret, &creds.token_secret).unwrap(),
            "hCtSmYh+iHYCEqBWrE7C7hYmtUk="
        );
    }

    #[test]
    fn header_lists_every_oauth_field() {
        let header = authorization_header(
            &docs_creds(),
            "POST",
            "https://api.x.com/2/tweets",
            "abc123",
            1700000000,
        )
        .unwrap();
        assert!(header.starts_with("OAuth "));
        for field in [
            "oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\"",
            "oauth_nonce=\"abc123\"",
            "oauth_signature_method=\"HMAC-SHA1\"",
            "oauth_timestamp=\"1700000000\"",
            "oauth_version=\"1.0\"",
            "oauth_signature=\"",
        ] {
            assert!(header.contains(field), "missing {field} in {header}");
        }
    }

    #[test]
    fn header_is_deterministic_for_fixed_nonce() {
        let a = authorization_header(&docs_creds(), "POST", "https://api.x.com/2/tweets", "n", 1).unwrap();
        let b = authorization_header(&docs_creds(), "POST", "https://api.x.com/2/tweets", "n", 1).unwrap();
        let c = authorization_header(&docs_creds(), "POST", "https://api.x.com/2/tweets", "m", 1).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn nonces_are_unique_and_alphanumeric() {
        let a = fresh_nonce();
        assert_ne!(a, fresh_nonce());
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

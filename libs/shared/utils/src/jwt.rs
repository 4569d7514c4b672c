use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{JwtClaims, JwtHeader, Operator};

type HmacSha256 = Hmac<Sha256>;

/// Sign `claims` as an HS256 JWT.
pub fn encode_token(claims: &JwtClaims, jwt_secret: &str) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };
    let header_json = serde_json::to_vec(&header).map_err(|e| e.to_string())?;
    let claims_json = serde_json::to_vec(claims).map_err(|e| e.to_string())?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

/// Issue an operator token valid for `ttl_minutes`.
pub fn issue_token(
    username: &str,
    role: &str,
    jwt_secret: &str,
    ttl_minutes: i64,
) -> Result<(String, DateTime<Utc>), String> {
    let now = Utc::now();
    let expires_at = TimeDelta::try_minutes(ttl_minutes)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| format!("Token lifetime of {} minutes is out of range", ttl_minutes))?;

    let claims = JwtClaims {
        sub: username.to_string(),
        role: Some(role.to_string()),
        exp: Some(expires_at.timestamp().max(0) as u64),
        iat: Some(now.timestamp().max(0) as u64),
    };

    let token = encode_token(&claims, jwt_secret)?;
    Ok((token, expires_at))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Operator, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signature_string = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signature_string.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp().max(0) as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err("Token expired".to_string());
        }
    }

    let issued_at = claims
        .iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let operator = Operator {
        username: claims.sub,
        role: claims.role,
        issued_at,
    };

    debug!("Token validated successfully for operator: {}", operator.username);
    Ok(operator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_validates() {
        let (token, expires_at) = issue_token("admin", "admin", SECRET, 5).unwrap();
        assert!(expires_at > Utc::now());

        let operator = validate_token(&token, SECRET).unwrap();
        assert_eq!(operator.username, "admin");
        assert!(operator.is_admin());
        assert!(operator.issued_at.is_some());
    }

    #[test]
    fn rejects_wrong_secret() {
        let (token, _) = issue_token("admin", "admin", SECRET, 5).unwrap();
        assert_matches!(validate_token(&token, "other"), Err(msg) if msg == "Invalid token signature");
    }

    #[test]
    fn rejects_expired_token() {
        let (token, _) = issue_token("admin", "admin", SECRET, -5).unwrap();
        assert_matches!(validate_token(&token, SECRET), Err(msg) if msg == "Token expired");
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        assert_matches!(
            issue_token("admin", "admin", SECRET, 1_000_000_000_000),
            Err(msg) if msg.contains("out of range")
        );
        assert!(issue_token("admin", "admin", SECRET, i64::MAX).is_err());
    }

    #[test]
    fn rejects_malformed_token() {
        assert_matches!(validate_token("not-a-token", SECRET), Err(msg) if msg == "Invalid token format");
    }

    #[test]
    fn refuses_empty_secret() {
        assert!(issue_token("admin", "admin", "", 5).is_err());
        assert!(validate_token("a.b.c", "").is_err());
    }
}

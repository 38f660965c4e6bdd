//! Secret strength validation module
//!
//! Validates HMAC signing secrets for cryptographic strength to prevent weak key attacks

use anyhow::{anyhow, Result};

const MIN_SECRET_LENGTH: usize = 32; // 256 bits minimum
const RECOMMENDED_SECRET_LENGTH: usize = 64; // 512 bits recommended

/// Secret strength classification
#[derive(Debug, PartialEq, Eq)]
pub enum SecretStrength {
    /// Weak secret - REJECT
    Weak,
    /// Acceptable secret - WARN
    Acceptable,
    /// Strong secret - OK
    Strong,
}

/// Validate secret strength for HS256
///
/// **Criteria**:
/// - Minimum 32 bytes (256 bits)
/// - Recommended 64 bytes (512 bits)
/// - Shannon entropy > 4.0 bits/byte
/// - No obvious patterns (repeating characters, sequential)
pub fn validate_secret_strength(secret: &str) -> Result<SecretStrength> {
    let bytes = secret.as_bytes();

    if bytes.is_empty() {
        return Err(anyhow!("Secret must not be empty"));
    }

    if bytes.len() < MIN_SECRET_LENGTH {
        return Ok(SecretStrength::Weak);
    }

    let entropy = calculate_shannon_entropy(bytes);
    if entropy < 4.0 {
        return Ok(SecretStrength::Weak);
    }

    if has_obvious_patterns(bytes) {
        return Ok(SecretStrength::Weak);
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= 5.0 {
        Ok(SecretStrength::Strong)
    } else {
        Ok(SecretStrength::Acceptable)
    }
}

/// Calculate Shannon entropy of byte sequence
///
/// Returns bits per byte (0-8 scale)
fn calculate_shannon_entropy(data: &[u8]) -> f64 {
    let mut freq = [0u32; 256];
    let len = data.len() as f64;

    for &byte in data {
        freq[byte as usize] += 1;
    }

    let mut entropy = 0.0;
    for &count in freq.iter() {
        if count > 0 {
            let p = count as f64 / len;
            entropy -= p * p.log2();
        }
    }

    entropy
}

/// Detect runs of 4 identical bytes ("aaaa") or 4 ascending bytes ("abcd", "1234")
fn has_obvious_patterns(data: &[u8]) -> bool {
    if data.len() < 4 {
        return false;
    }

    let mut consecutive_same = 1;
    let mut consecutive_seq = 1;
    for window in data.windows(2) {
        if window[0] == window[1] {
            consecutive_same += 1;
        } else {
            consecutive_same = 1;
        }

        if window[1] as i16 - window[0] as i16 == 1 {
            consecutive_seq += 1;
        } else {
            consecutive_seq = 1;
        }

        if consecutive_same >= 4 || consecutive_seq >= 4 {
            return true;
        }
    }

    false
}

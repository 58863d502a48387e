//! HR Field Encryption
//!
//! 员工档案的敏感字段 (住址、IBAN、薪资备注) 落库前用
//! AES-256-GCM 加密，密钥来自 `HR_KEY` 环境变量 (64 位十六进制)。
//!
//! 密文布局: `base64(nonce(12) || sealed)`，每次加密随机 nonce。

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, NONCE_LEN, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

use crate::db::models::{EncryptedHr, StaffHr};

/// 开发环境默认密钥 — 生产环境必须显式配置 HR_KEY
const DEV_KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Encryption failed")]
    Encrypt,

    #[error("Decryption failed")]
    Decrypt,
}

/// AEAD cipher for staff HR fields
pub struct FieldCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl FieldCipher {
    /// 从十六进制密钥字符串构造 (32 字节 = 64 hex chars)
    pub fn from_hex(key_hex: &str) -> Result<Self, CryptoError> {
        let key_bytes = hex::decode(key_hex)
            .map_err(|e| CryptoError::InvalidKey(format!("not hex: {e}")))?;
        if key_bytes.len() != AES_256_GCM.key_len() {
            return Err(CryptoError::InvalidKey(format!(
                "expected {} bytes, got {}",
                AES_256_GCM.key_len(),
                key_bytes.len()
            )));
        }
        let unbound = UnboundKey::new(&AES_256_GCM, &key_bytes)
            .map_err(|_| CryptoError::InvalidKey("key rejected".into()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// 开发默认密钥 (仅限非生产环境)
    pub fn development() -> Self {
        Self::from_hex(DEV_KEY_HEX).expect("development key is valid")
    }

    /// Encrypt one plaintext field
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::Encrypt)?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Encrypt)?;

        let mut blob = Vec::with_capacity(NONCE_LEN + in_out.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&in_out);
        Ok(B64.encode(blob))
    }

    /// Decrypt one ciphertext field
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let blob = B64.decode(ciphertext).map_err(|_| CryptoError::Decrypt)?;
        if blob.len() < NONCE_LEN {
            return Err(CryptoError::Decrypt);
        }
        let (nonce_bytes, sealed) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| CryptoError::Decrypt)?;

        let mut in_out = sealed.to_vec();
        let plain = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Decrypt)?;
        String::from_utf8(plain.to_vec()).map_err(|_| CryptoError::Decrypt)
    }

    /// 可选字段加密 (None 原样传递)
    pub fn encrypt_opt(&self, plaintext: Option<&str>) -> Result<Option<String>, CryptoError> {
        plaintext.map(|p| self.encrypt(p)).transpose()
    }

    /// 整组 HR 字段解密
    pub fn decrypt_hr(&self, hr: &EncryptedHr) -> Result<StaffHr, CryptoError> {
        Ok(StaffHr {
            address: hr.address.as_deref().map(|c| self.decrypt(c)).transpose()?,
            iban: hr.iban.as_deref().map(|c| self.decrypt(c)).transpose()?,
            salary_note: hr
                .salary_note
                .as_deref()
                .map(|c| self.decrypt(c))
                .transpose()?,
        })
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 不打印密钥材料
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let cipher = FieldCipher::development();
        let plain = "Musterstraße 12, 80331 München";
        let sealed = cipher.encrypt(plain).unwrap();
        assert_ne!(sealed, plain);
        assert_eq!(cipher.decrypt(&sealed).unwrap(), plain);
    }

    #[test]
    fn test_random_nonce_gives_distinct_ciphertexts() {
        let cipher = FieldCipher::development();
        let a = cipher.encrypt("DE89370400440532013000").unwrap();
        let b = cipher.encrypt("DE89370400440532013000").unwrap();
        assert_ne!(a, b);
        assert_eq!(cipher.decrypt(&a).unwrap(), cipher.decrypt(&b).unwrap());
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let cipher = FieldCipher::development();
        let sealed = cipher.encrypt("secret").unwrap();
        let mut blob = B64.decode(&sealed).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        let tampered = B64.encode(blob);
        assert!(cipher.decrypt(&tampered).is_err());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let cipher = FieldCipher::development();
        let other = FieldCipher::from_hex(
            "ffeeddccbbaa99887766554433221100ffeeddccbbaa99887766554433221100",
        )
        .unwrap();
        let sealed = cipher.encrypt("secret").unwrap();
        assert!(other.decrypt(&sealed).is_err());
    }

    #[test]
    fn test_invalid_key_length() {
        assert!(FieldCipher::from_hex("abcd").is_err());
        assert!(FieldCipher::from_hex("zz").is_err());
    }

    #[test]
    fn test_decrypt_hr_partial_fields() {
        let cipher = FieldCipher::development();
        let hr = EncryptedHr {
            address: Some(cipher.encrypt("Saalgasse 1").unwrap()),
            iban: None,
            salary_note: None,
        };
        let view = cipher.decrypt_hr(&hr).unwrap();
        assert_eq!(view.address.as_deref(), Some("Saalgasse 1"));
        assert!(view.iban.is_none());
    }
}

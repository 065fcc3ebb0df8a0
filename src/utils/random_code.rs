use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成指定长度的字母数字随机串（考勤令牌等）
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 生成满足密码策略的随机密码（大小写字母与数字各至少一个）
pub fn generate_password(len: usize) -> String {
    let len = len.max(8);
    loop {
        let candidate = generate_random_code(len);
        if crate::utils::validate::validate_password(&candidate).is_valid {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_has_requested_length() {
        let code = generate_random_code(32);
        assert_eq!(code.len(), 32);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn codes_differ() {
        assert_ne!(generate_random_code(32), generate_random_code(32));
    }

    #[test]
    fn generated_password_passes_policy() {
        let password = generate_password(16);
        assert_eq!(password.len(), 16);
        assert!(crate::utils::validate::validate_password(&password).is_valid);
    }
}

use rand::Rng;

/// Generates a one-time passcode: 6 ASCII digits, uniform over [100000, 999999].
/// The range itself guarantees the fixed width, no zero-padding edge cases.
pub fn generate_otp_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{}", rng.gen_range(100000..=999999))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));

            let code_num: u32 = code.parse().unwrap();
            assert!((100000..=999999).contains(&code_num));
        }
    }

    #[test]
    fn test_codes_cover_the_whole_range() {
        // Bucket by leading digit; over 10k draws every bucket 1..=9 should
        // be hit many times if the distribution is anywhere near uniform.
        let mut buckets = [0u32; 10];
        for _ in 0..10_000 {
            let code = generate_otp_code();
            let first = code.as_bytes()[0] - b'0';
            buckets[first as usize] += 1;
        }
        assert_eq!(buckets[0], 0);
        for (digit, &count) in buckets.iter().enumerate().skip(1) {
            assert!(
                count > 500,
                "leading digit {digit} drawn only {count} times in 10k"
            );
        }
    }
}

use rand::Rng;
use rand::distr::Alphanumeric;

/// 默认 id 长度，与 nanoid 一致
pub const DEFAULT_ID_LENGTH: usize = 21;

/// 生成由 62 个字母数字字符组成的随机 id，用于文件名
///
/// 只保证概率上不冲突，不能用作安全凭据。
pub fn generate_id(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn generate_default_id() -> String {
    generate_id(DEFAULT_ID_LENGTH)
}

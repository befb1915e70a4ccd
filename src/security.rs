//! Security Module
//!
//! 入力サイズの制限と、出力ファイル名の検証を提供するモジュール。

/// セキュリティ設定
///
/// ファイル処理時の制限を定義します。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 256MB (268_435_456 bytes)
    pub max_input_file_size: u64,
    /// 読み込む最大行数（ヘッダー行を除く）
    /// デフォルト: 1,048,575（Excelの最大行数 - 1）
    pub max_rows: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 268_435_456, // 256MB
            max_rows: 1_048_575,
        }
    }
}

impl SecurityConfig {
    /// 入力サイズを検証
    pub fn check_input_size(&self, size: u64) -> Result<(), String> {
        if size > self.max_input_file_size {
            return Err(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                size, self.max_input_file_size
            ));
        }
        Ok(())
    }
}

/// 出力ファイル名の語幹（拡張子なし）を検証
///
/// 出力先ディレクトリの外に書き込まないよう、パス区切り文字や`..`を含む
/// 名前を拒否します。
///
/// # 戻り値
///
/// * `Ok(())` - 名前が安全な場合
/// * `Err(String)` - 名前が危険な場合
pub(crate) fn validate_output_stem(stem: &str) -> Result<(), String> {
    if stem.trim().is_empty() {
        return Err("Empty output file name is not allowed".to_string());
    }

    if stem.contains('/') || stem.contains('\\') {
        return Err(format!("Path separator in output file name: {}", stem));
    }

    if stem.contains("..") {
        return Err(format!("Path traversal detected: {}", stem));
    }

    if stem.chars().any(|c| c.is_control()) {
        return Err(format!("Control character in output file name: {:?}", stem));
    }

    Ok(())
}

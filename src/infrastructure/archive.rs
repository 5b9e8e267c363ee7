//! 内存中的 zip 打包
//!
//! 所有条目使用固定的修改时间（1980-01-01），同样的输入总是得到同样的字节。

use std::io::{Cursor, Read, Write};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::AppResult;

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644)
}

/// 按写入顺序追加条目的 zip 写入器
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    entries: Vec<String>,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            entries: Vec::new(),
        }
    }

    /// 写入一个文件条目
    pub fn add_file(&mut self, name: &str, bytes: &[u8]) -> AppResult<()> {
        self.zip.start_file(name, entry_options())?;
        self.zip.write_all(bytes).map_err(ZipError::Io)?;
        self.entries.push(name.to_string());
        Ok(())
    }

    /// 已写入的条目名
    pub fn entry_names(&self) -> &[String] {
        &self.entries
    }

    pub fn finish(self) -> AppResult<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// 读取 zip 中的所有条目（名称, 内容），保持存储顺序
pub fn read_entries(bytes: &[u8]) -> AppResult<Vec<(String, Vec<u8>)>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut content = Vec::new();
        file.read_to_end(&mut content).map_err(ZipError::Io)?;
        entries.push((file.name().to_string(), content));
    }

    Ok(entries)
}

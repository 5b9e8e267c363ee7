use crate::error::FileError;
use crate::models::job::{Job, JobFile};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载任务
pub async fn load_job_file(toml_file_path: &Path) -> Result<JobFile> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: toml_file_path.display().to_string(),
            source,
        })?;

    let job: Job = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
        path: toml_file_path.display().to_string(),
        source,
    })?;

    if let Job::Quiz(quiz) = &job {
        anyhow::ensure!(
            quiz.request.target_count >= 1,
            "题目数量必须至少为 1: {}",
            toml_file_path.display()
        );
    }

    Ok(JobFile {
        path: toml_file_path.to_path_buf(),
        job,
    })
}

/// 从文件夹中加载所有 TOML 任务，按文件名排序
pub async fn load_all_job_files(folder_path: &str) -> Result<Vec<JobFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut jobs = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_job_file(&path).await {
            Ok(job) => jobs.push(job),
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "canvas_content_creator_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_all_job_files_skips_invalid() {
        let dir = temp_dir("loader");
        std::fs::write(
            dir.join("b_quiz.toml"),
            r#"
            kind = "quiz"
            [request]
            topic = "Fractions"
            target_count = 5
            grade_level = "5"
            standard = "CCSS 5.NF.A.1"
            "#,
        )
        .unwrap();
        std::fs::write(dir.join("a_broken.toml"), "kind = \"quiz\"\n").unwrap();
        std::fs::write(
            dir.join("c_zero.toml"),
            r#"
            kind = "quiz"
            [request]
            topic = "Fractions"
            target_count = 0
            grade_level = "5"
            standard = "CCSS 5.NF.A.1"
            "#,
        )
        .unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let jobs = load_all_job_files(dir.to_str().unwrap()).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].name(), "b_quiz.toml");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_parse_failure_names_the_file() {
        let dir = temp_dir("parse_failure");
        let path = dir.join("broken.toml");
        std::fs::write(&path, "kind = ").unwrap();

        let err = load_job_file(&path).await.unwrap_err();
        match err.downcast_ref::<FileError>() {
            Some(FileError::TomlParseFailed { path: reported, .. }) => {
                assert!(reported.ends_with("broken.toml"))
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let missing = load_job_file(&dir.join("absent.toml")).await.unwrap_err();
        assert!(matches!(
            missing.downcast_ref::<FileError>(),
            Some(FileError::ReadFailed { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        assert!(load_all_job_files("/definitely/not/here").await.is_err());
    }
}

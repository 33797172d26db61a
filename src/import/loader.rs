//! 课程数据写入
//!
//! 学期与课程都只在不存在时插入，重复运行不会产生重复记录。

use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::import::parser::{merge_courses, parse_coursedetails, parse_pdf_list};
use crate::models::course::{Course, Semester};
use crate::storage::repository::CourseRepository;

/// 主数据文件
pub const COURSEDETAILS_FILE: &str = "coursedetails.json";
/// 补充数据文件，可缺省
pub const PDF_FILE: &str = "pdf.json";

/// 导入报告
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub semester_inserted: bool,
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 课程导入器
pub struct CourseImporter {
    repository: Arc<dyn CourseRepository>,
}

impl CourseImporter {
    pub fn new(repository: Arc<dyn CourseRepository>) -> Self {
        Self { repository }
    }

    /// 从数据目录读取并写入
    pub async fn run(&self, data_dir: &Path) -> Result<ImportReport> {
        let details = read_json(&data_dir.join(COURSEDETAILS_FILE))?.ok_or_else(|| {
            AppError::NotFound(format!(
                "{} not found in {}",
                COURSEDETAILS_FILE,
                data_dir.display()
            ))
        })?;
        let parsed = parse_coursedetails(&details)?;
        tracing::info!(courses = parsed.courses.len(), "parsed {}", COURSEDETAILS_FILE);

        let pdf_courses = match read_json(&data_dir.join(PDF_FILE))? {
            Some(document) => parse_pdf_list(&document)?,
            None => {
                tracing::info!("{} not present, skipping", PDF_FILE);
                Vec::new()
            }
        };

        let courses = merge_courses(parsed.courses, pdf_courses);
        tracing::info!(courses = courses.len(), "merged course data");

        self.load(parsed.semester.as_ref(), &courses).await
    }

    /// 写入学期与课程
    pub async fn load(&self, semester: Option<&Semester>, courses: &[Course]) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        if let Some(semester) = semester {
            if self.repository.semester_exists(semester.code).await? {
                tracing::info!(code = semester.code, "semester already exists, skipping");
            } else {
                self.repository.insert_semester(semester).await?;
                report.semester_inserted = true;
                tracing::info!(code = semester.code, "semester inserted");
            }
        }

        for course in courses {
            match self.load_course(course).await {
                Ok(true) => report.inserted += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    tracing::error!(course_id = %course.course_id, error = %e, "failed to insert course");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failed,
            "course import finished"
        );
        Ok(report)
    }

    async fn load_course(&self, course: &Course) -> Result<bool> {
        if self
            .repository
            .course_exists(&course.course_id, course.semester)
            .await?
        {
            tracing::debug!(course_id = %course.course_id, "course already exists, skipping");
            return Ok(false);
        }
        self.repository.insert_course(course).await?;
        Ok(true)
    }
}

/// 读取 JSON 文件，文件不存在时返回 None
fn read_json(path: &Path) -> Result<Option<Value>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

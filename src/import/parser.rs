//! 课程数据解析
//!
//! `coursedetails.json` 的结构为 `term[0]` 下挂学期信息与
//! `subjects[*].courses[*]`；`pdf.json` 是扁平的课程列表，学期取自每条记录。

use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::course::{Course, Semester};

/// 一个学期的解析结果
#[derive(Debug, Clone, Default)]
pub struct ParsedTerm {
    pub semester: Option<Semester>,
    pub courses: Vec<Course>,
}

/// 学期代码：字符串或数字，非数字时为 0
pub fn semester_code(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// 递归去掉 null 字段，使其回落到默认值
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// 解析单门课程；解析失败时记录警告并返回 None
pub fn parse_course(raw: &Value, semester: u32) -> Option<Course> {
    let Value::Object(map) = raw else {
        tracing::warn!("skipping course record that is not an object");
        return None;
    };

    let mut map: Map<String, Value> = map.clone();
    map.remove("semester");
    // 空的 detail 视为缺失
    if map
        .get("detail")
        .and_then(Value::as_object)
        .is_some_and(Map::is_empty)
    {
        map.remove("detail");
    }

    let mut value = Value::Object(map);
    strip_nulls(&mut value);

    match serde_json::from_value::<Course>(value) {
        Ok(mut course) => {
            course.semester = semester;
            Some(course)
        }
        Err(e) => {
            let course_id = raw.get("course_id").and_then(Value::as_str).unwrap_or("?");
            tracing::warn!(course_id, error = %e, "skipping unparseable course");
            None
        }
    }
}

fn parse_semester(term: &Map<String, Value>, code: u32) -> Result<Semester> {
    let mut fields = Map::new();
    for key in ["name", "cal_name", "reg_name", "start_date", "end_date"] {
        if let Some(value) = term.get(key).filter(|v| !v.is_null()) {
            fields.insert(key.to_string(), value.clone());
        }
    }
    let mut semester: Semester = serde_json::from_value(Value::Object(fields))?;
    semester.code = code;
    Ok(semester)
}

/// 解析 coursedetails.json
pub fn parse_coursedetails(document: &Value) -> Result<ParsedTerm> {
    let Some(term) = document
        .get("term")
        .and_then(Value::as_array)
        .and_then(|terms| terms.first())
        .and_then(Value::as_object)
    else {
        return Err(AppError::Validation(
            "coursedetails document has no term".to_string(),
        ));
    };

    let code = semester_code(term.get("code"));
    let semester = parse_semester(term, code)?;

    let courses = term
        .get("subjects")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|subject| subject.get("courses").and_then(Value::as_array))
        .flatten()
        .filter_map(|raw| parse_course(raw, code))
        .collect();

    Ok(ParsedTerm {
        semester: Some(semester),
        courses,
    })
}

/// 解析 pdf.json
pub fn parse_pdf_list(document: &Value) -> Result<Vec<Course>> {
    let records = document
        .as_array()
        .ok_or_else(|| AppError::Validation("pdf document must be a list".to_string()))?;

    Ok(records
        .iter()
        .filter_map(|raw| parse_course(raw, semester_code(raw.get("semester"))))
        .collect())
}

/// 合并两个来源，键为 (course_id, semester)，`primary` 优先，保持首次出现的顺序
pub fn merge_courses(primary: Vec<Course>, secondary: Vec<Course>) -> Vec<Course> {
    let mut seen = std::collections::HashSet::new();
    primary
        .into_iter()
        .chain(secondary)
        .filter(|course| seen.insert(course.merge_key()))
        .collect()
}

// ==========================================
// 大学成果分析看板 - 结构/数据校验器
// ==========================================
// 职责: 必需列 / 类型可转换性 / 数值范围 / 枚举成员
// 红线: 整表校验通过之前不得写入任何数据（全有或全无）
// ==========================================
// 组合校验顺序: 必需列 → 数值列类型 → 范围与枚举（按记录类型固定顺序）
// 第一个失败即返回，不跨检查累计
// ==========================================

use crate::domain::types::{
    EnrollmentStatus, ExecutionStatus, Gender, JournalGrade, ProgramType, ProjectLinked,
};
use crate::importer::columns::{kpi, publication, research_budget, student};
use crate::importer::error::{IngestError, IngestResult};
use crate::importer::table::{CellValue, DataTable};
use rust_decimal::Decimal;
use std::fmt;

// ==========================================
// 值类型 / 值范围
// ==========================================

/// 列的声明类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Decimal,
    Text,
}

impl ValueKind {
    /// 报错用名称
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Integer => "int",
            ValueKind::Decimal => "decimal",
            ValueKind::Text => "str",
        }
    }

    pub fn accepts(&self, cell: &CellValue) -> bool {
        match self {
            ValueKind::Integer => cell.to_i64().is_some(),
            ValueKind::Decimal => cell.to_decimal().is_some(),
            ValueKind::Text => true,
        }
    }
}

/// 闭区间 [min, max]，max 为 None 时上界开放
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: Decimal,
    pub max: Option<Decimal>,
}

impl ValueRange {
    pub fn closed(min: i64, max: i64) -> Self {
        Self {
            min: Decimal::from(min),
            max: Some(Decimal::from(max)),
        }
    }

    pub fn at_least(min: i64) -> Self {
        Self {
            min: Decimal::from(min),
            max: None,
        }
    }
}

/// 报错时的值列表，形如 ['a', 'b'] 或 [1999, 2101]
struct ValueList<'a>(&'a [String], bool);

impl fmt::Display for ValueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ValueList(values, quoted) = self;
        write!(f, "[")?;
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if *quoted {
                write!(f, "'{}'", v)?;
            } else {
                write!(f, "{}", v)?;
            }
        }
        write!(f, "]")
    }
}

fn distinct_in_order(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

// ==========================================
// 通用校验
// ==========================================

/// 必需列校验：列出全部缺失列（按声明顺序），多余列忽略
pub fn validate_required_columns(table: &DataTable, required: &[&str]) -> IngestResult<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !table.has_column(col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::MissingColumn { columns: missing })
    }
}

/// 类型校验：缺失值豁免，不存在的列跳过；第一个失败的列报错
pub fn validate_data_types(table: &DataTable, kinds: &[(&str, ValueKind)]) -> IngestResult<()> {
    for (column, kind) in kinds {
        let offending = distinct_in_order(
            table
                .non_missing_values(column)
                .into_iter()
                .filter(|v| !kind.accepts(v))
                .map(|v| v.to_string()),
        );

        if !offending.is_empty() {
            return Err(IngestError::DataType {
                column: column.to_string(),
                expected: kind.name().to_string(),
                detail: format!("Found: {}", ValueList(&offending, true)),
            });
        }
    }
    Ok(())
}

/// 范围校验：先报低于下界的值，再报高于上界的值
pub fn validate_value_ranges(
    table: &DataTable,
    ranges: &[(&str, ValueRange)],
) -> IngestResult<()> {
    for (column, range) in ranges {
        let mut numbers = Vec::new();
        for cell in table.non_missing_values(column) {
            match cell.to_decimal() {
                Some(d) => numbers.push(d),
                None => {
                    return Err(IngestError::DataType {
                        column: column.to_string(),
                        expected: ValueKind::Decimal.name().to_string(),
                        detail: format!("Found: {}", ValueList(&[cell.to_string()], true)),
                    })
                }
            }
        }

        let below: Vec<String> = numbers
            .iter()
            .filter(|d| **d < range.min)
            .map(|d| d.normalize().to_string())
            .collect();
        if !below.is_empty() {
            let detail = if range.max.is_none() && range.min.is_zero() {
                format!("has negative values: {}", ValueList(&below, false))
            } else {
                format!(
                    "has values below minimum {}: {}",
                    range.min,
                    ValueList(&below, false)
                )
            };
            return Err(IngestError::ValueRange {
                column: column.to_string(),
                detail,
            });
        }

        if let Some(max) = range.max {
            let above: Vec<String> = numbers
                .iter()
                .filter(|d| **d > max)
                .map(|d| d.normalize().to_string())
                .collect();
            if !above.is_empty() {
                return Err(IngestError::ValueRange {
                    column: column.to_string(),
                    detail: format!(
                        "has values above maximum {}: {}",
                        max,
                        ValueList(&above, false)
                    ),
                });
            }
        }
    }
    Ok(())
}

/// 枚举校验：非缺失值的去重集合必须是允许集合的子集
pub fn validate_allowed_values(
    table: &DataTable,
    column: &str,
    allowed: &[&str],
) -> IngestResult<()> {
    let invalid = distinct_in_order(
        table
            .non_missing_values(column)
            .into_iter()
            .map(|v| v.to_string())
            .filter(|v| !allowed.contains(&v.as_str())),
    );

    if invalid.is_empty() {
        return Ok(());
    }

    let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
    Err(IngestError::ValueRange {
        column: column.to_string(),
        detail: format!(
            "has invalid values. Allowed: {}. Found: {}",
            ValueList(&allowed, true),
            ValueList(&invalid, true)
        ),
    })
}

// ==========================================
// 按记录类型的组合校验
// ==========================================

pub fn validate_department_kpi_data(table: &DataTable) -> IngestResult<()> {
    validate_required_columns(table, &kpi::REQUIRED)?;

    validate_data_types(
        table,
        &[
            (kpi::EVALUATION_YEAR, ValueKind::Integer),
            (kpi::EMPLOYMENT_RATE, ValueKind::Decimal),
            (kpi::FULL_TIME_FACULTY, ValueKind::Integer),
            (kpi::VISITING_FACULTY, ValueKind::Integer),
            (kpi::TECH_TRANSFER_INCOME, ValueKind::Decimal),
            (kpi::INTL_CONFERENCE_COUNT, ValueKind::Integer),
        ],
    )?;

    validate_value_ranges(
        table,
        &[
            (kpi::EVALUATION_YEAR, ValueRange::closed(2000, 2100)),
            (kpi::EMPLOYMENT_RATE, ValueRange::closed(0, 100)),
            (kpi::FULL_TIME_FACULTY, ValueRange::closed(0, 1000)),
            (kpi::VISITING_FACULTY, ValueRange::closed(0, 1000)),
            (kpi::TECH_TRANSFER_INCOME, ValueRange::at_least(0)),
            (kpi::INTL_CONFERENCE_COUNT, ValueRange::closed(0, 1000)),
        ],
    )
}

pub fn validate_publication_data(table: &DataTable) -> IngestResult<()> {
    validate_required_columns(table, &publication::REQUIRED)?;

    validate_data_types(table, &[(publication::IMPACT_FACTOR, ValueKind::Decimal)])?;

    validate_allowed_values(table, publication::JOURNAL_GRADE, JournalGrade::ALLOWED)?;
    validate_allowed_values(table, publication::PROJECT_LINKED, ProjectLinked::ALLOWED)?;
    validate_value_ranges(table, &[(publication::IMPACT_FACTOR, ValueRange::at_least(0))])
}

pub fn validate_research_budget_data(table: &DataTable) -> IngestResult<()> {
    validate_required_columns(table, &research_budget::REQUIRED)?;

    validate_data_types(
        table,
        &[
            (research_budget::TOTAL_BUDGET, ValueKind::Integer),
            (research_budget::AMOUNT, ValueKind::Integer),
        ],
    )?;

    validate_allowed_values(table, research_budget::STATUS, ExecutionStatus::ALLOWED)?;
    validate_value_ranges(
        table,
        &[
            (research_budget::TOTAL_BUDGET, ValueRange::at_least(0)),
            (research_budget::AMOUNT, ValueRange::at_least(0)),
        ],
    )
}

pub fn validate_student_data(table: &DataTable) -> IngestResult<()> {
    validate_required_columns(table, &student::REQUIRED)?;

    validate_data_types(
        table,
        &[
            (student::GRADE, ValueKind::Integer),
            (student::ADMISSION_YEAR, ValueKind::Integer),
        ],
    )?;

    validate_value_ranges(table, &[(student::GRADE, ValueRange::closed(0, 4))])?;
    validate_allowed_values(table, student::PROGRAM_TYPE, ProgramType::ALLOWED)?;
    validate_allowed_values(table, student::ENROLLMENT_STATUS, EnrollmentStatus::ALLOWED)?;
    validate_allowed_values(table, student::GENDER, Gender::ALLOWED)?;
    validate_value_ranges(
        table,
        &[(student::ADMISSION_YEAR, ValueRange::closed(1900, 2100))],
    )
}

//! 文档导出服务 - 业务能力层
//!
//! 把名册转换成"标题 + 副标题 + 三列表格"的文档，具体渲染交给
//! [`DocumentRenderer`]，这里只负责筛选行、拼标题和生成文件名

use std::path::PathBuf;

use regex::Regex;
use tracing::info;

use crate::config::Config;
use crate::error::ExportError;
use crate::models::{RosterConfiguration, RosterState};

/// 表头
pub const TABLE_HEAD: [&str; 3] = ["#", "Nombre Completo", "Hora de Entrega"];

/// 标题样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStyle {
    /// 主标题（学校名称）
    Title,
    /// 副标题
    Subtitle,
}

/// 单元格对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// 待渲染的表格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
    /// 每列的对齐方式，缺省为居中
    pub column_align: Vec<Align>,
}

impl Table {
    pub fn align_of(&self, column: usize) -> Align {
        self.column_align.get(column).copied().unwrap_or(Align::Center)
    }
}

/// 文档渲染能力
pub trait DocumentRenderer {
    /// 追加一行标题
    fn add_title(&mut self, text: &str, style: TitleStyle);

    /// 追加表格
    fn add_table(&mut self, table: &Table);

    /// 保存文档，返回写入的路径
    fn save(&mut self, filename: &str) -> Result<PathBuf, ExportError>;
}

/// 导出的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// 从 1 开始的行号
    pub number: usize,
    pub name: String,
    pub time: String,
}

impl ExportRow {
    fn into_cells(self) -> Vec<String> {
        vec![self.number.to_string(), self.name, self.time]
    }
}

/// 筛选出已交卷的条目（姓名非空且已登记时间），保持原顺序并重新编号
pub fn qualifying_rows(state: &RosterState) -> Vec<ExportRow> {
    state
        .entries()
        .iter()
        .filter(|entry| entry.is_checked_in())
        .enumerate()
        .map(|(index, entry)| ExportRow {
            number: index + 1,
            name: entry.name.clone(),
            time: entry.time.clone().unwrap_or_default(),
        })
        .collect()
}

/// 文件名片段：转小写，`[a-z0-9]` 以外的字符都替换为 `_`
fn sanitize_segment(text: &str) -> Result<String, regex::Error> {
    let re = Regex::new(r"[^a-z0-9]")?;
    Ok(re.replace_all(&text.to_lowercase(), "_").into_owned())
}

/// 生成导出文件名：`registro_<年级>_<考试>.pdf`
pub fn export_filename(config: &RosterConfiguration) -> Result<String, ExportError> {
    let grade = sanitize_segment(&config.grade)?;
    let exam = sanitize_segment(config.exam_label.map(|e| e.label()).unwrap_or_default())?;
    Ok(format!("registro_{grade}_{exam}.pdf"))
}

/// 文档导出器
#[derive(Debug, Clone)]
pub struct DocumentExporter {
    institution_name: String,
    exam_series: String,
}

impl DocumentExporter {
    /// 从配置创建
    pub fn new(config: &Config) -> Self {
        Self::with_header(&config.institution_name, &config.exam_series)
    }

    pub fn with_header(
        institution_name: impl Into<String>,
        exam_series: impl Into<String>,
    ) -> Self {
        Self {
            institution_name: institution_name.into(),
            exam_series: exam_series.into(),
        }
    }

    pub fn institution_name(&self) -> &str {
        &self.institution_name
    }

    /// 副标题：考试行 + 年级行
    pub fn subtitle_lines(&self, config: &RosterConfiguration) -> Vec<String> {
        let exam = config.exam_label.map(|e| e.label()).unwrap_or_default();
        let exam_line = if self.exam_series.trim().is_empty() {
            format!("Registro de Entrega - {exam}")
        } else {
            format!("Registro de Entrega - {exam} {}", self.exam_series)
        };
        vec![exam_line, config.grade.clone()]
    }

    /// 构建导出表格
    pub fn build_table(&self, state: &RosterState) -> Table {
        Table {
            head: TABLE_HEAD.iter().map(|h| h.to_string()).collect(),
            body: qualifying_rows(state)
                .into_iter()
                .map(ExportRow::into_cells)
                .collect(),
            column_align: vec![Align::Center, Align::Left, Align::Center],
        }
    }

    /// 导出名册，返回写入的文件路径
    pub fn export(
        &self,
        state: &RosterState,
        renderer: &mut dyn DocumentRenderer,
    ) -> Result<PathBuf, ExportError> {
        let filename = export_filename(state.config())?;
        let table = self.build_table(state);

        renderer.add_title(&self.institution_name, TitleStyle::Title);
        for line in self.subtitle_lines(state.config()) {
            renderer.add_title(&line, TitleStyle::Subtitle);
        }
        renderer.add_table(&table);

        let path = renderer.save(&filename)?;
        info!("📄 已导出 {} 行到 {}", table.body.len(), path.display());
        Ok(path)
    }
}

//! PDF 渲染器
//!
//! 直接输出 PDF 1.4：A4 页面、标准 Helvetica 字体（WinAnsi 编码）、
//! 标题居中、表格分页并在每页重复表头

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::ExportError;
use crate::services::export::{Align, DocumentRenderer, Table, TitleStyle};

const MM: f32 = 72.0 / 25.4;
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 14.0 * MM;

const TITLE_SIZE: f32 = 18.0;
const SUBTITLE_SIZE: f32 = 12.0;
const CELL_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 20.0;
const CELL_PADDING: f32 = 5.0;
/// 单元格折行后的行距
const LINE_HEIGHT: f32 = CELL_SIZE * 1.15;

/// 第一行标题的基线位置（距页面顶部）
const FIRST_TITLE_TOP: f32 = 22.0 * MM;
/// 表格最早从这里开始
const TABLE_TOP: f32 = 50.0 * MM;

/// 表头底色 #378FAE
const HEAD_FILL: (u8, u8, u8) = (55, 143, 174);
/// 隔行底色
const STRIPE_FILL: (u8, u8, u8) = (245, 245, 245);

/// 各列宽度占比：序号、姓名、时间
const COLUMN_WEIGHTS: [f32; 3] = [0.15, 0.55, 0.30];

/// Helvetica 字宽（1/1000 em），覆盖 ASCII 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

#[derive(Debug, Clone)]
enum Element {
    Title(String, TitleStyle),
    Table(Table),
}

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// PDF 渲染器，`save` 时写入输出目录
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    output_dir: PathBuf,
    elements: Vec<Element>,
}

impl PdfRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            elements: Vec::new(),
        }
    }

    /// 生成完整的 PDF 字节
    pub fn render(&self) -> Vec<u8> {
        let pages = self.layout();
        assemble_pdf(&pages)
    }

    /// 把元素排版成每页一个内容流
    fn layout(&self) -> Vec<String> {
        let mut page = PageBuilder::default();
        let mut pages = Vec::new();
        let mut cursor = FIRST_TITLE_TOP;

        for element in &self.elements {
            match element {
                Element::Title(text, style) => {
                    let (size, gray, font) = match style {
                        TitleStyle::Title => (TITLE_SIZE, 40, Font::Bold),
                        TitleStyle::Subtitle => (SUBTITLE_SIZE, 100, Font::Regular),
                    };
                    let x = (PAGE_WIDTH - text_width(text, size)) / 2.0;
                    page.text(font, size, gray_rgb(gray), x, cursor, text);
                    cursor += match style {
                        TitleStyle::Title => 8.0 * MM,
                        TitleStyle::Subtitle => 6.0 * MM,
                    };
                }
                Element::Table(table) => {
                    cursor = cursor.max(TABLE_TOP);
                    cursor = draw_table(table, cursor, &mut page, &mut pages);
                }
            }
        }

        pages.push(page.finish());
        pages
    }
}

impl DocumentRenderer for PdfRenderer {
    fn add_title(&mut self, text: &str, style: TitleStyle) {
        self.elements.push(Element::Title(text.to_string(), style));
    }

    fn add_table(&mut self, table: &Table) {
        self.elements.push(Element::Table(table.clone()));
    }

    fn save(&mut self, filename: &str) -> Result<PathBuf, ExportError> {
        let bytes = self.render();
        let path = self.output_dir.join(filename);

        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        fs::write(&path, &bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        debug!("PDF 已写入 {} ({} 字节)", path.display(), bytes.len());
        Ok(path)
    }
}

/// 画表格，返回表格结束后的纵向位置；换页时把已完成的页推入 `pages`
fn draw_table(table: &Table, top: f32, page: &mut PageBuilder, pages: &mut Vec<String>) -> f32 {
    let table_width = PAGE_WIDTH - 2.0 * MARGIN;
    let columns = table.head.len().max(1);
    let widths: Vec<f32> = (0..columns)
        .map(|i| {
            if columns == COLUMN_WEIGHTS.len() {
                COLUMN_WEIGHTS[i] * table_width
            } else {
                table_width / columns as f32
            }
        })
        .collect();

    let head = wrap_row(&table.head, &widths);
    let mut y = top;
    draw_row(page, &head, table, &widths, y, true, None);
    y += head.height;

    for (index, cells) in table.body.iter().enumerate() {
        let row = wrap_row(cells, &widths);
        if y + row.height > PAGE_HEIGHT - MARGIN {
            pages.push(std::mem::take(page).finish());
            y = MARGIN;
            draw_row(page, &head, table, &widths, y, true, None);
            y += head.height;
        }
        let fill = (index % 2 == 1).then_some(STRIPE_FILL);
        draw_row(page, &row, table, &widths, y, false, fill);
        y += row.height;
    }

    y
}

/// 折行后的一行：每个单元格若干行文字
struct WrappedRow {
    cells: Vec<Vec<String>>,
    height: f32,
}

fn wrap_row(cells: &[String], widths: &[f32]) -> WrappedRow {
    let cells: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(column, width)| {
            let text = cells.get(column).map(String::as_str).unwrap_or_default();
            wrap_text(text, width - 2.0 * CELL_PADDING, CELL_SIZE)
        })
        .collect();
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    WrappedRow {
        cells,
        height: ROW_HEIGHT + (lines - 1) as f32 * LINE_HEIGHT,
    }
}

/// 按单词贪心折行；单个词超宽时按字符截断
fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for c in word.chars() {
            current.push(c);
            if text_width(&current, size) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn draw_row(
    page: &mut PageBuilder,
    row: &WrappedRow,
    table: &Table,
    widths: &[f32],
    top: f32,
    is_head: bool,
    fill: Option<(u8, u8, u8)>,
) {
    let table_width: f32 = widths.iter().sum();
    if is_head {
        page.rect(HEAD_FILL, MARGIN, top, table_width, row.height);
    } else if let Some(color) = fill {
        page.rect(color, MARGIN, top, table_width, row.height);
    }

    let (font, color) = if is_head {
        (Font::Bold, (255, 255, 255))
    } else {
        (Font::Regular, gray_rgb(50))
    };
    let first_baseline = top + ROW_HEIGHT / 2.0 + CELL_SIZE * 0.35;

    let mut x = MARGIN;
    for (column, width) in widths.iter().enumerate() {
        let lines = row.cells.get(column).map(Vec::as_slice).unwrap_or_default();
        for (line_index, text) in lines.iter().enumerate() {
            let text_x = match table.align_of(column) {
                Align::Left => x + CELL_PADDING,
                Align::Center => x + (width - text_width(text, CELL_SIZE)) / 2.0,
            };
            let baseline = first_baseline + line_index as f32 * LINE_HEIGHT;
            page.text(font, CELL_SIZE, color, text_x, baseline, text);
        }
        x += width;
    }
}

fn gray_rgb(level: u8) -> (u8, u8, u8) {
    (level, level, level)
}

/// 估算文本宽度（pt）
fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                u32::from(HELVETICA_WIDTHS[(code - 32) as usize])
            } else {
                556
            }
        })
        .sum();
    units as f32 / 1000.0 * size
}

/// 单页内容流
#[derive(Debug, Default)]
struct PageBuilder {
    ops: String,
}

impl PageBuilder {
    /// `top` 为距页面顶部的距离
    fn text(&mut self, font: Font, size: f32, color: (u8, u8, u8), x: f32, top: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        let _ = writeln!(
            self.ops,
            "BT /{} {} Tf {} rg {:.2} {:.2} Td ({}) Tj ET",
            font.resource(),
            fmt_num(size),
            rgb_operands(color),
            x,
            PAGE_HEIGHT - top,
            encode_text(text)
        );
    }

    fn rect(&mut self, color: (u8, u8, u8), x: f32, top: f32, width: f32, height: f32) {
        let _ = writeln!(
            self.ops,
            "{} rg {:.2} {:.2} {:.2} {:.2} re f",
            rgb_operands(color),
            x,
            PAGE_HEIGHT - top - height,
            width,
            height
        );
    }

    fn finish(self) -> String {
        self.ops
    }
}

fn fmt_num(value: f32) -> String {
    format!("{value:.2}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn rgb_operands((r, g, b): (u8, u8, u8)) -> String {
    format!(
        "{} {} {}",
        fmt_num(f32::from(r) / 255.0),
        fmt_num(f32::from(g) / 255.0),
        fmt_num(f32::from(b) / 255.0)
    )
}

/// 转成 WinAnsi 字节并按 PDF 字符串规则转义，非 ASCII 字节用八进制
fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let byte = win_ansi_byte(c);
        match byte {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        code @ 0x20..=0x7e => code as u8,
        code @ 0xa0..=0xff => code as u8,
        _ => match c {
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        },
    }
}

/// 组装 PDF 文件：目录、页树、两个字体，然后每页一个 Page + 内容流
fn assemble_pdf(pages: &[String]) -> Vec<u8> {
    let page_count = pages.len();
    let first_page_obj = 5;
    let object_count = 4 + 2 * page_count;

    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::with_capacity(object_count);

    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", first_page_obj + 2 * i))
        .collect();

    let mut objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        )
        .into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_vec(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    ];

    for (i, content) in pages.iter().enumerate() {
        let contents_obj = first_page_obj + 2 * i + 1;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {contents_obj} 0 R >>"
            )
            .into_bytes(),
        );
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(content.as_bytes());
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", object_count + 1);
    for offset in &offsets {
        let _ = writeln!(xref, "{offset:010} 00000 n ");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        object_count + 1,
        xref_offset
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_table(rows: usize) -> Table {
        Table {
            head: vec!["#".into(), "Nombre Completo".into(), "Hora de Entrega".into()],
            body: (1..=rows)
                .map(|i| vec![i.to_string(), format!("Alumno {i}"), "9:00:00 AM".into()])
                .collect(),
            column_align: vec![Align::Center, Align::Left, Align::Center],
        }
    }

    /// 非 ASCII 字节逐个替换成 `?`，保持字节偏移不变
    fn as_text(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect()
    }

    #[test]
    fn test_encode_text_escapes() {
        assert_eq!(encode_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(encode_text("Año"), "A\\361o");
        assert_eq!(encode_text("日"), "?");
    }

    #[test]
    fn test_pdf_structure_and_xref_offsets() {
        let mut renderer = PdfRenderer::new(".");
        renderer.add_title("INSTITUCION EDUCATIVA", TitleStyle::Title);
        renderer.add_title("5B", TitleStyle::Subtitle);
        renderer.add_table(&sample_table(3));

        let bytes = renderer.render();
        let text = as_text(&bytes);

        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("(INSTITUCION EDUCATIVA) Tj"));
        assert!(text.contains("(Nombre Completo) Tj"));
        assert!(text.contains("(Alumno 3) Tj"));
        assert!(text.contains("0.22 0.56 0.68 rg"));

        // startxref 指向 xref 表，表中每个偏移都指向 "n 0 obj"
        let startxref = text.rfind("startxref\n").unwrap();
        let xref_offset: usize = text[startxref + 10..]
            .lines()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!(text[xref_offset..].starts_with("xref\n0 7\n"));

        let entries: Vec<usize> = text[xref_offset..]
            .lines()
            .skip(3)
            .take(6)
            .map(|line| line[..10].parse().unwrap())
            .collect();
        for (i, offset) in entries.iter().enumerate() {
            assert!(text[*offset..].starts_with(&format!("{} 0 obj", i + 1)));
        }
    }

    #[test]
    fn test_stream_length_matches_content() {
        let mut renderer = PdfRenderer::new(".");
        renderer.add_title("Título", TitleStyle::Title);
        let text = as_text(&renderer.render());

        let start = text.find("/Length ").unwrap() + 8;
        let length: usize = text[start..].split_whitespace().next().unwrap().parse().unwrap();
        let body_start = text.find("stream\n").unwrap() + 7;
        let body_end = text.find("\nendstream").unwrap();
        assert_eq!(body_end - body_start, length);
    }

    #[test]
    fn test_long_table_paginates_with_repeated_head() {
        let mut renderer = PdfRenderer::new(".");
        renderer.add_table(&sample_table(80));
        let text = as_text(&renderer.render());

        assert!(text.contains("/Count 3"));
        assert_eq!(text.matches("(Nombre Completo) Tj").count(), 3);
        assert!(text.contains("(Alumno 80) Tj"));
    }

    #[test]
    fn test_long_name_wraps_inside_its_column() {
        let name = "María Fernanda de los Ángeles Gutiérrez Villanueva Rodríguez";
        let table_width = PAGE_WIDTH - 2.0 * MARGIN;
        let name_width = COLUMN_WEIGHTS[1] * table_width - 2.0 * CELL_PADDING;
        assert!(text_width(name, CELL_SIZE) > name_width);

        let lines = wrap_text(name, name_width, CELL_SIZE);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.join(" "), name);
        for line in &lines {
            assert!(text_width(line, CELL_SIZE) <= name_width);
        }

        let mut table = sample_table(1);
        table.body[0][1] = name.to_string();
        let mut renderer = PdfRenderer::new(".");
        renderer.add_table(&table);
        let text = as_text(&renderer.render());
        // 姓名分两行画出，时间列仍是单独的一段文字
        assert_eq!(text.matches(") Tj").count(), 3 + 4);
        assert!(text.contains("(9:00:00 AM) Tj"));
    }

    #[test]
    fn test_wrap_text_breaks_overlong_word() {
        let lines = wrap_text("WWWWWWWWWW", 30.0, CELL_SIZE);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "WWWWWWWWWW");
        for line in &lines {
            assert!(text_width(line, CELL_SIZE) <= 30.0);
        }
        assert_eq!(wrap_text("", 30.0, CELL_SIZE), vec![String::new()]);
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempdir().unwrap();
        let mut renderer = PdfRenderer::new(dir.path().join("out"));
        renderer.add_table(&sample_table(1));

        let path = renderer.save("registro_5b_3er_examen.pdf").unwrap();

        assert_eq!(path, dir.path().join("out").join("registro_5b_3er_examen.pdf"));
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF-1.4"));
    }
}

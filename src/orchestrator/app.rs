//! 控制台应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：打开文件存储，恢复名册
//! 2. **事件循环**：逐行读取命令，单线程顺序执行
//! 3. **界面**：每次修改后重新打印名册，并给出西班牙语提示
//! 4. **确认**：清空名册前要求用户明确回答 `s/n`
//!
//! 具体的修改和前置条件都委托给 [`RosterSession`]

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{Clock, FileKeyValueStore, KeyValueStore, SystemClock};
use crate::models::{EntryUpdate, RosterState};
use crate::orchestrator::command::{Command, CommandError};
use crate::services::{DocumentExporter, PdfRenderer, RosterRepository};
use crate::utils::logging::{log_session_end, log_startup, truncate_text};
use crate::workflow::{Gate, RosterSession, SessionError};

const NAME_WIDTH: usize = 40;

pub const HELP_TEXT: &str = "\
Comandos:
  grado <texto>          Configurar el grado (p. ej. grado 5B)
  examen <etiqueta|n>    Configurar el examen (p. ej. examen 3 o examen 3er Examen)
  agregar                Agregar fila
  nombre <id> <texto>    Escribir el nombre completo del alumno
  hora <id>              Registrar la hora de entrega
  pdf                    Generar PDF
  limpiar                Borrar todos los registros
  lista                  Mostrar el registro
  ayuda                  Mostrar esta ayuda
  salir                  Salir";

const CLEAR_PROMPT: &str =
    "¿Está seguro de que desea borrar todos los registros? Esta acción no se puede deshacer. (s/n): ";

/// 应用主结构
pub struct App<S, C> {
    config: Config,
    session: RosterSession<S, C>,
    exporter: DocumentExporter,
    /// 已显示清空提示，等待回答
    pending_clear: bool,
}

impl App<FileKeyValueStore, SystemClock> {
    /// 初始化应用：文件存储 + 系统时钟
    pub fn initialize(config: Config) -> Self {
        log_startup(&config);

        let repository = RosterRepository::new(FileKeyValueStore::new(&config.data_dir));
        let session = RosterSession::open(repository, SystemClock);
        Self::with_session(config, session)
    }
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    pub fn with_session(config: Config, session: RosterSession<S, C>) -> Self {
        let exporter = DocumentExporter::new(&config);
        Self {
            config,
            session,
            exporter,
            pending_clear: false,
        }
    }

    pub fn session(&self) -> &RosterSession<S, C> {
        &self.session
    }

    /// 运行事件循环，直到 `salir` 或输入结束
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        output.write_all(self.render_roster().as_bytes()).await?;
        output.write_all(b"Escriba 'ayuda' para ver los comandos.\n").await?;

        loop {
            if !self.pending_clear {
                output.write_all(b"> ").await?;
            }
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            if self.pending_clear {
                let reply = self.confirm_clear(&line);
                output.write_all(reply.as_bytes()).await?;
                continue;
            }

            let reply = match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command),
                Err(CommandError::Empty) => continue,
                Err(e) => {
                    warn!("无法解析命令 {:?}: {}", line, e);
                    format!(
                        "Comando no válido: {}. Escriba 'ayuda' para ver los comandos.\n",
                        line.trim()
                    )
                }
            };

            output.write_all(reply.as_bytes()).await?;
        }

        output.write_all(b"Hasta luego.\n").await?;
        output.flush().await?;
        log_session_end(self.session.state());
        Ok(())
    }

    /// 执行一个命令，返回要显示的文本
    pub fn execute(&mut self, command: Command) -> String {
        match command {
            Command::SetGrade(grade) => {
                self.session.set_grade(grade);
                self.with_roster("Grado actualizado.")
            }
            Command::SetExam(exam) => {
                self.session.set_exam_label(Some(exam));
                self.with_roster("Examen actualizado.")
            }
            Command::Add => match self.session.add_entry() {
                Ok(id) => self.with_roster(&format!("Fila agregada (id {id}).")),
                Err(gate) => gate_message(gate),
            },
            Command::Rename { id, name } => match self.session.rename_entry(id, name) {
                Ok(EntryUpdate::Updated) => self.with_roster("Nombre actualizado."),
                Ok(outcome) => self.update_message(id, outcome),
                Err(gate) => gate_message(gate),
            },
            Command::RegisterTime(id) => match self.session.register_time(id) {
                Ok(EntryUpdate::Updated) => {
                    let time = self.entry_time(id);
                    self.with_roster(&format!("Hora registrada: {time}"))
                }
                Ok(outcome) => self.update_message(id, outcome),
                Err(gate) => gate_message(gate),
            },
            Command::Export => self.export(),
            Command::Clear => {
                self.pending_clear = true;
                CLEAR_PROMPT.to_string()
            }
            Command::List => self.render_roster(),
            Command::Help => format!("{HELP_TEXT}\n"),
            Command::Quit => String::new(),
        }
    }

    /// 处理清空确认的回答
    ///
    /// 只有先执行过 [`Command::Clear`] 才会生效
    pub fn confirm_clear(&mut self, answer: &str) -> String {
        if !std::mem::take(&mut self.pending_clear) {
            warn!("没有待确认的清空操作，忽略回答 {:?}", answer);
            return "No hay ninguna operación pendiente.\n".to_string();
        }
        if is_yes(answer) {
            self.session.clear_all();
            self.with_roster("Registro borrado.")
        } else {
            info!("用户取消了清空操作");
            "Operación cancelada.\n".to_string()
        }
    }

    fn export(&mut self) -> String {
        let mut renderer = PdfRenderer::new(&self.config.export_dir);
        match self.session.export(&self.exporter, &mut renderer) {
            Ok(path) => format!("PDF generado: {}\n", path.display()),
            Err(SessionError::Gate(gate)) => gate_message(gate),
            Err(SessionError::Export(_)) => {
                "No se pudo generar el PDF. Revise el archivo de registro.\n".to_string()
            }
        }
    }

    fn entry_time(&self, id: u32) -> String {
        self.session
            .state()
            .entry(id)
            .and_then(|e| e.time.clone())
            .unwrap_or_default()
    }

    fn update_message(&self, id: u32, outcome: EntryUpdate) -> String {
        match outcome {
            EntryUpdate::Updated => String::new(),
            EntryUpdate::NotFound => format!("No existe la fila con id {id}.\n"),
            EntryUpdate::Locked => format!(
                "La fila {id} ya tiene hora registrada; el nombre no se puede modificar.\n"
            ),
            EntryUpdate::EmptyName => {
                "Ingrese el nombre completo del alumno antes de registrar la hora.\n".to_string()
            }
            EntryUpdate::AlreadyRegistered => format!(
                "La fila {id} ya tiene hora registrada ({}).\n",
                self.entry_time(id)
            ),
        }
    }

    fn with_roster(&self, message: &str) -> String {
        format!("{message}\n{}", self.render_roster())
    }

    /// 打印当前名册
    pub fn render_roster(&self) -> String {
        render_roster(
            self.session.state(),
            self.exporter.institution_name(),
            &self.config.exam_series,
        )
    }
}

/// 把名册渲染成控制台表格
pub fn render_roster(state: &RosterState, institution: &str, exam_series: &str) -> String {
    let mut out = String::new();
    let rule = "=".repeat(72);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{institution}");

    let config = state.config();
    if state.is_configured() {
        let exam = config.exam_label.map(|e| e.label()).unwrap_or_default();
        let _ = writeln!(
            out,
            "{} - {}",
            format!("{exam} {exam_series}").trim(),
            config.grade.trim()
        );
    } else {
        let _ = writeln!(
            out,
            "Configure el grado ('grado <texto>') y el examen ('examen <n>') para comenzar."
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(72));
    let _ = writeln!(
        out,
        "{:<4} {:<4} {:<width$} {}",
        "#",
        "ID",
        "Nombre Completo",
        "Registrar Hora",
        width = NAME_WIDTH
    );

    for (index, entry) in state.entries().iter().enumerate() {
        let name = if entry.has_name() {
            truncate_text(&entry.name, NAME_WIDTH - 3)
        } else {
            "(sin nombre)".to_string()
        };
        let time = match &entry.time {
            Some(time) => time.clone(),
            None if entry.has_name() => format!("[hora {}]", entry.id),
            None => "—".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<4} {:<4} {:<width$} {}",
            index + 1,
            entry.id,
            name,
            time,
            width = NAME_WIDTH
        );
    }
    let _ = writeln!(out, "{rule}");
    out
}

fn gate_message(gate: Gate) -> String {
    match gate {
        Gate::NotConfigured => {
            "Primero configure el grado y el examen ('grado <texto>', 'examen <n>').\n".to_string()
        }
        Gate::NothingToExport => {
            "No hay alumnos con hora registrada para exportar.\n".to_string()
        }
        Gate::IdsExhausted => {
            "No se pueden agregar más filas. Borre el registro para empezar de nuevo.\n"
                .to_string()
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}

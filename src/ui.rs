//! Saída de terminal do transdesk: tabelas coloridas e barra de progresso.
//!
//! Usa `console` para estilização com cores e `indicatif` para desenhar o
//! progresso derivado de cada obra.

use console::Style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::error::{DeskError, FailureKind};
use crate::lifecycle::{StateRegistry, TransitionGuard, WorkItem, WorkState};
use crate::translator::Translator;

/// Renderizador das respostas da CLI.
pub struct Printer {
    // Estilo verde para sucesso e estados concluídos.
    green: Style,
    // Estilo vermelho para falhas.
    red: Style,
    // Estilo amarelo para avisos e estados intermediários.
    yellow: Style,
    // Estilo esmaecido para metadados.
    dim: Style,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }

    fn state_style(&self, state: WorkState) -> &Style {
        match state {
            WorkState::Completed | WorkState::ProjectAccepted => &self.green,
            WorkState::Cancelled => &self.red,
            WorkState::Draft => &self.dim,
            _ => &self.yellow,
        }
    }

    /// Linha curta de confirmação após uma ação bem-sucedida.
    pub fn done(&self, message: &str, work: &WorkItem) {
        println!(
            "  {} {message}: {} → {} ({}%)",
            self.green.apply_to("✓"),
            work.name,
            self.state_style(work.state()).apply_to(work.state()),
            work.progress_percent()
        );
    }

    /// Detalhe completo de uma obra, com a barra de progresso.
    pub fn work(&self, work: &WorkItem) {
        println!("{}", self.green.apply_to(&work.name));
        println!("  {} {}", self.dim.apply_to("id:        "), work.id);
        println!(
            "  {} {} ({})",
            self.dim.apply_to("state:     "),
            self.state_style(work.state()).apply_to(work.state()),
            work.state().label()
        );
        println!("  {} {}%", self.dim.apply_to("progress:  "), work.progress_percent());
        println!("  {} {}", self.dim.apply_to("priority:  "), work.priority);
        println!(
            "  {} {}",
            self.dim.apply_to("translator:"),
            work.translator.as_deref().unwrap_or("-")
        );
        println!(
            "  {} {} → {}",
            self.dim.apply_to("languages: "),
            work.source_language,
            work.target_language
        );
        if !work.author.is_empty() {
            println!("  {} {}", self.dim.apply_to("author:    "), work.author);
        }
        if !work.notes.is_empty() {
            println!("  {} {}", self.dim.apply_to("notes:     "), work.notes);
        }
        if !work.active {
            println!("  {}", self.red.apply_to("inactive"));
        }

        let next: Vec<String> = TransitionGuard::available_transitions(work)
            .iter()
            .map(|t| t.to_string())
            .collect();
        println!(
            "  {} {}",
            self.dim.apply_to("next:      "),
            if next.is_empty() { "-".to_string() } else { next.join(", ") }
        );

        self.progress_bar(work);
    }

    /// Uma linha por obra.
    pub fn list(&self, works: &[WorkItem]) {
        if works.is_empty() {
            println!("  {}", self.dim.apply_to("no works"));
            return;
        }
        for work in works {
            println!(
                "  {:<36}  {:<22} {:>3}%  {:<7} {}",
                work.id,
                self.state_style(work.state()).apply_to(work.state()),
                work.progress_percent(),
                work.priority,
                work.name
            );
        }
    }

    /// Tabela de estados e arestas do ciclo de vida.
    pub fn registry(&self) {
        println!("{}", self.green.apply_to("States"));
        for state in WorkState::ALL {
            println!(
                "  {:<20} {:>3}%  {}",
                state.code(),
                StateRegistry::progress_for(state),
                state.label()
            );
        }
        println!("{}", self.green.apply_to("Transitions"));
        for edge in StateRegistry::edges() {
            println!(
                "  {:<18} {} → {}  {}",
                edge.name,
                edge.from,
                edge.to,
                self.dim.apply_to(TransitionGuard::description(edge.name))
            );
        }
    }

    /// Cadastro de tradutores; inativos aparecem esmaecidos.
    pub fn translators(&self, translators: &[Translator]) {
        if translators.is_empty() {
            println!("  {}", self.dim.apply_to("no translators"));
            return;
        }
        for t in translators {
            let line = format!(
                "  {:<12} {:<32} {}",
                t.id,
                t.full_name,
                t.email.as_deref().unwrap_or("-")
            );
            if t.active {
                println!("{line}");
            } else {
                println!("{}", self.dim.apply_to(line));
            }
        }
    }

    pub fn permission(&self, allowed: bool) {
        if allowed {
            println!("  {} allowed", self.green.apply_to("✓"));
        } else {
            println!("  {} denied", self.red.apply_to("✗"));
        }
    }

    /// Erro com o status HTTP equivalente.
    pub fn error(&self, err: &DeskError) {
        let style = match err.kind() {
            FailureKind::Business => &self.yellow,
            FailureKind::System => &self.red,
        };
        eprintln!(
            "  {} [{}] {err}",
            self.red.apply_to("✗"),
            style.apply_to(err.status_code())
        );
    }

    // Barra estática: a posição é o progresso derivado do estado.
    fn progress_bar(&self, work: &WorkItem) {
        let pb = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stdout());
        pb.set_style(
            ProgressStyle::with_template("  [{bar:40.cyan/blue}] {pos:>3}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        pb.set_position(u64::from(work.progress_percent()));
        pb.abandon();
    }
}

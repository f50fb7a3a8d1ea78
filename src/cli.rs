//! Interface de linha de comando do transdesk baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (create, approve,
//! assign-translator, start-trial, ...) e flags globais que identificam o
//! ator (--actor, --role) além de --verbose e --data-file.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::lifecycle::{Priority, WorkState};
use crate::permissions::{Operation, Role};

/// transdesk: acompanha obras de tradução ao longo do fluxo editorial.
#[derive(Debug, Parser)]
#[command(name = "transdesk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Identificador do ator que executa o comando.
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Papel organizacional do ator (ex.: director, translator).
    #[arg(long, global = true)]
    pub role: Option<Role>,

    /// Arquivo de dados; sobrepõe `transdesk.toml` e o ambiente.
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Prioridade aceita pela CLI, mapeada para [`Priority`] internamente.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Normal,
    High,
    Urgent,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Normal => Priority::Normal,
            PriorityArg::High => Priority::High,
            PriorityArg::Urgent => Priority::Urgent,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cria uma obra em rascunho (draft).
    Create {
        /// Nome da obra.
        name: String,

        #[arg(long)]
        author: Option<String>,

        /// Título no idioma original.
        #[arg(long)]
        original_name: Option<String>,

        #[arg(long)]
        source_language: Option<String>,

        #[arg(long)]
        target_language: Option<String>,

        #[arg(long, default_value_t = 0)]
        pages: u32,

        #[arg(long, default_value_t = 0)]
        words: u32,

        #[arg(long, value_enum, default_value = "normal")]
        priority: PriorityArg,

        /// Tradutor pré-selecionado.
        #[arg(long)]
        translator: Option<String>,
    },

    /// Lista obras ativas.
    List {
        /// Inclui obras desativadas.
        #[arg(long, default_value_t = false)]
        all: bool,

        #[arg(long)]
        state: Option<WorkState>,

        #[arg(long)]
        translator: Option<String>,

        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
    },

    /// Mostra uma obra e as transições disponíveis.
    Show { id: String },

    /// Aprova uma obra em rascunho.
    Approve { id: String },

    /// Atribui o tradutor e avança para `translator_assigned`.
    AssignTranslator {
        id: String,

        /// Tradutor a atribuir; sem ele, usa o já selecionado na obra.
        #[arg(long)]
        translator: Option<String>,
    },

    /// Inicia a tradução de teste.
    StartTrial { id: String },

    /// Altera a prioridade de uma obra.
    SetPriority {
        id: String,
        #[arg(value_enum)]
        priority: PriorityArg,
    },

    /// Atualiza campos descritivos de uma obra.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        pages: Option<u32>,
        #[arg(long)]
        words: Option<u32>,
    },

    /// Desativa (exclusão lógica) uma obra.
    Deactivate { id: String },

    /// Verifica se o ator pode executar uma operação.
    Can {
        /// Operação (list, retrieve, create, update, destroy, approve, ...).
        operation: Operation,

        /// Obra alvo, para regras que dependem do tradutor atribuído.
        #[arg(long)]
        work: Option<String>,
    },

    /// Lista os tradutores cadastrados.
    Translators,

    /// Cadastra um tradutor; a atribuição passa a exigir o cadastro.
    AddTranslator {
        id: String,

        /// Nome completo.
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Mostra os estados, o progresso de cada um e as transições.
    States,
}

//src/main.rs

use std::io::Write;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use marketmemo::{
    common::error::AppError,
    config::{AppConfig, AppState},
    handlers::{
        self,
        inventory::ProductArgs,
        scanner::{CodeScanner, LineScanner},
    },
};

#[derive(Parser, Debug)]
#[command(name = "marketmemo")]
#[command(about = "Cadastro de produtos e análise de estoque", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lista os produtos, do mais novo para o mais antigo
    List {
        /// Busca por nome, código ou departamento
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Adiciona um produto
    Add {
        #[command(flatten)]
        product: ProductArgs,

        /// Lê o código do leitor (uma linha na entrada padrão)
        #[arg(long, default_value_t = false)]
        scan: bool,
    },

    /// Edita um produto; campos omitidos mantêm o valor atual
    Edit {
        id: Uuid,

        #[command(flatten)]
        product: ProductArgs,
    },

    /// Exclui um produto
    Remove { id: Uuid },

    /// Estatísticas: resumo, distribuição e inventário
    Stats,

    /// Departamentos disponíveis
    Departments,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut app_state = AppState::new(AppConfig::from_env());

    let result: Result<String, AppError> = match cli.command {
        Commands::List { search } => Ok(handlers::inventory::list(&app_state, search.as_deref())),
        Commands::Add { product, scan } => {
            let mut scanner = LineScanner::stdin();
            let scanner: Option<&mut dyn CodeScanner> = if scan {
                eprintln!("Aguardando leitura do código...");
                Some(&mut scanner)
            } else {
                None
            };
            handlers::inventory::add(&mut app_state, product, scanner).await
        }
        Commands::Edit { id, product } => handlers::inventory::edit(&mut app_state, id, product),
        Commands::Remove { id } => Ok(handlers::inventory::remove(&mut app_state, id)),
        Commands::Stats => Ok(handlers::inventory::stats(&app_state)),
        Commands::Departments => Ok(handlers::inventory::departments(&app_state)),
    };

    // Erros do serviço são recuperáveis: viram mensagem para o usuário, não pânico.
    match result {
        Ok(output) => {
            // Saída fechada (ex.: `| head`) é erro inesperado, não recusa do serviço
            writeln!(std::io::stdout().lock(), "{output}")
                .context("falha ao escrever a saída")?;
            Ok(())
        }
        Err(e) => {
            tracing::warn!("operação recusada: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

// src/handlers/inventory.rs
//
// Camada de apresentação do binário: transforma os argumentos em intenções
// para o InventoryService e devolve o texto a mostrar. Não guarda cópia da
// coleção; sempre relê o snapshot do serviço depois de cada chamada.

use clap::Args;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::scanner::CodeScanner,
    models::inventory::{Product, ProductFormData},
    services::{dashboard_service, Outcome, Persistence},
};

// ---
// Payload: campos do formulário de produto
// ---
#[derive(Debug, Clone, Default, Args)]
pub struct ProductArgs {
    /// Código do produto
    #[arg(long)]
    pub code: Option<String>,

    /// Nome do produto
    #[arg(long)]
    pub name: Option<String>,

    /// Preço (R$)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Departamento (ver `departments`)
    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Quantidade em estoque
    #[arg(long)]
    pub stock: Option<u32>,

    /// Estoque mínimo
    #[arg(long)]
    pub min_stock: Option<u32>,

    /// Apaga as notas (edição)
    #[arg(long, conflicts_with = "notes")]
    pub clear_notes: bool,

    /// Apaga o estoque (edição)
    #[arg(long, conflicts_with = "stock")]
    pub clear_stock: bool,

    /// Apaga o estoque mínimo (edição)
    #[arg(long, conflicts_with = "min_stock")]
    pub clear_min_stock: bool,
}

// Valor informado, ou apagado, ou o que já estava.
fn merge_optional<T>(given: Option<T>, clear: bool, base: Option<T>) -> Option<T> {
    if clear { None } else { given.or(base) }
}

impl ProductArgs {
    // Campos não informados ficam com o valor de `base` (formulário pré-preenchido).
    fn merge_into(self, base: ProductFormData) -> ProductFormData {
        ProductFormData {
            code: self.code.unwrap_or(base.code),
            name: self.name.unwrap_or(base.name),
            price: self.price.unwrap_or(base.price),
            department: self.department.unwrap_or(base.department),
            notes: merge_optional(self.notes, self.clear_notes, base.notes),
            stock: merge_optional(self.stock, self.clear_stock, base.stock),
            min_stock: merge_optional(self.min_stock, self.clear_min_stock, base.min_stock),
        }
    }
}

// O formulário só oferece departamentos da configuração (era um select fechado).
fn validate_department(state: &AppState, form: &ProductFormData) -> Result<(), AppError> {
    if state.config.is_known_department(&form.department) {
        return Ok(());
    }
    let mut err = ValidationError::new("department");
    err.message = Some(format!("Departamento desconhecido: {}", form.department).into());
    let mut errors = ValidationErrors::new();
    errors.add("department", err);
    Err(AppError::ValidationError(errors))
}

fn blank_form(state: &AppState) -> ProductFormData {
    ProductFormData {
        code: String::new(),
        name: String::new(),
        price: Decimal::ZERO,
        department: state.config.departments.first().cloned().unwrap_or_default(),
        notes: None,
        stock: None,
        min_stock: None,
    }
}

fn persistence_notice<T>(outcome: &Outcome<T>, lines: &mut Vec<String>) {
    if let Persistence::MemoryOnly { reason } = &outcome.persistence {
        lines.push(format!(
            "⚠ Não foi possível salvar os produtos ({reason}). As alterações ficam apenas em memória."
        ));
    }
}

fn product_line(product: &Product) -> String {
    let mut line = format!(
        "{}  [{}]  {}  Código: {}  {}",
        product.id,
        product.department,
        product.name,
        product.code,
        product.display_price()
    );
    match (product.stock, product.min_stock) {
        (Some(stock), Some(min)) => line.push_str(&format!("  Estoque: {stock} (mín. {min})")),
        (Some(stock), None) => line.push_str(&format!("  Estoque: {stock}")),
        (None, Some(min)) => line.push_str(&format!("  Estoque mín.: {min}")),
        (None, None) => {}
    }
    if product.is_low_stock() {
        line.push_str("  ⚠ estoque baixo");
    }
    line
}

// ---
// Handler: list
// ---
pub fn list(state: &AppState, search: Option<&str>) -> String {
    let term = search.unwrap_or_default();
    let products = state.inventory_service.search(term);

    if products.is_empty() {
        return if term.is_empty() {
            "Você ainda não adicionou nenhum produto.".to_string()
        } else {
            "Nenhum produto encontrado com os critérios de busca.".to_string()
        };
    }
    products.into_iter().map(product_line).collect::<Vec<_>>().join("\n")
}

// ---
// Handler: add
// ---
pub async fn add(
    state: &mut AppState,
    args: ProductArgs,
    scanner: Option<&mut dyn CodeScanner>,
) -> Result<String, AppError> {
    let mut args = args;
    if let Some(scanner) = scanner {
        match scanner.scan().await? {
            Some(code) => args.code = Some(code),
            None => tracing::info!("nenhum código lido, mantendo o informado"),
        }
    }

    let form = args.merge_into(blank_form(state));
    validate_department(state, &form)?;

    let outcome = state.inventory_service.add(form)?;
    let mut lines = vec![
        "Produto adicionado com sucesso!".to_string(),
        product_line(&outcome.value),
    ];
    persistence_notice(&outcome, &mut lines);
    Ok(lines.join("\n"))
}

// ---
// Handler: edit
// ---
pub fn edit(state: &mut AppState, id: Uuid, args: ProductArgs) -> Result<String, AppError> {
    let current = state
        .inventory_service
        .get(id)
        .map(ProductFormData::from_product)
        .ok_or(AppError::ProductNotFound(id))?;

    let form = args.merge_into(current);
    validate_department(state, &form)?;

    let outcome = state.inventory_service.update(id, form)?;
    let mut lines = vec![
        "Produto atualizado com sucesso!".to_string(),
        product_line(&outcome.value),
    ];
    persistence_notice(&outcome, &mut lines);
    Ok(lines.join("\n"))
}

// ---
// Handler: remove
// ---
pub fn remove(state: &mut AppState, id: Uuid) -> String {
    let outcome = state.inventory_service.remove(id);
    let mut lines = vec![match &outcome.value {
        Some(product) => format!("Produto excluído com sucesso: {}", product.name),
        None => "Nada a excluir: o produto já não existe.".to_string(),
    }];
    persistence_notice(&outcome, &mut lines);
    lines.join("\n")
}

// ---
// Handler: stats
// ---
pub fn stats(state: &AppState) -> String {
    let products = state.inventory_service.products();
    let mut lines = Vec::new();

    // Resumo
    let summary = dashboard_service::summary(products);
    lines.push("Resumo".to_string());
    lines.push(format!("  Total de Produtos: {}", summary.total_products));
    lines.push(format!("  Departamentos: {}", summary.departments));
    lines.push(format!(
        "  Última Atualização: {}",
        summary
            .last_updated
            .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    ));

    // Distribuição
    lines.push("Produtos por Departamento".to_string());
    let shares = dashboard_service::department_distribution(products);
    if shares.is_empty() {
        lines.push("  Adicione produtos para ver o gráfico".to_string());
    }
    for share in shares {
        lines.push(format!(
            "  {}: {} produtos ({}%)",
            share.department, share.count, share.percentage
        ));
    }

    // Inventário
    lines.push("Inventário".to_string());
    let Some(analysis) = dashboard_service::inventory_analysis(products) else {
        lines.push(
            "  Adicione informações de estoque aos produtos para ver análises de inventário."
                .to_string(),
        );
        return lines.join("\n");
    };

    lines.push(format!(
        "  Estoque Total: {} ({} produtos com informações de estoque)",
        analysis.stock.total_units, analysis.stock.products_with_stock
    ));
    lines.push(format!("  Produtos em Estoque Baixo: {}", analysis.low_stock.len()));
    if analysis.low_stock.is_empty() {
        lines.push("    Todos os produtos em níveis adequados".to_string());
    } else {
        lines.push("    Recomendado repor estoque".to_string());
    }

    lines.push("  Maior Estoque".to_string());
    for product in &analysis.highest_stock {
        lines.push(format!("    {}: {}", product.name, product.stock.unwrap_or_default()));
    }
    lines.push("  Menor Estoque".to_string());
    for product in &analysis.lowest_stock {
        lines.push(format!("    {}: {}", product.name, product.stock.unwrap_or_default()));
    }

    if let Some(best) = analysis.highest_average_department {
        lines.push(format!(
            "  Departamento com Maior Estoque Médio: {} ({:.1} unidades/produto)",
            best.department, best.average
        ));
    }
    lines.join("\n")
}

// ---
// Handler: departments
// ---
pub fn departments(state: &AppState) -> String {
    state.config.departments.join("\n")
}

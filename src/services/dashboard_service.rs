// src/services/dashboard_service.rs
//
// Análises derivadas da coleção. Funções puras sobre um snapshot: sem estado,
// sem cache, baratas para o volume de um inventário digitado à mão.
// "Sem dados" é sempre explícito (vetor vazio ou `None`), nunca NaN ou divisão por zero.

use std::collections::{HashMap, HashSet};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    dashboard::{
        DepartmentAverage, DepartmentShare, InventoryAnalysis, InventorySummary, StockAggregate,
    },
    inventory::Product,
};

// Quantos produtos entram em cada ranking do painel.
pub const RANKING_SIZE: usize = 3;

// Agrupa por departamento mantendo a ordem do primeiro encontro.
fn group_by_department<'a, T: Default>(
    products: impl Iterator<Item = &'a Product>,
    mut fold: impl FnMut(&mut T, &'a Product),
) -> Vec<(&'a str, T)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, T)> = Vec::new();

    for product in products {
        let slot = *index.entry(product.department.as_str()).or_insert_with(|| {
            groups.push((product.department.as_str(), T::default()));
            groups.len() - 1
        });
        fold(&mut groups[slot].1, product);
    }
    groups
}

// --- 1. Distribuição por departamento ---
pub fn department_distribution(products: &[Product]) -> Vec<DepartmentShare> {
    let total = products.len();
    if total == 0 {
        return Vec::new();
    }

    group_by_department(products.iter(), |count: &mut usize, _| *count += 1)
        .into_iter()
        .map(|(department, count)| DepartmentShare {
            department: department.to_string(),
            count,
            // Meio arredonda para cima, como o rótulo do gráfico
            percentage: (Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        })
        .collect()
}

// --- 2. Estoque total ---
pub fn stock_aggregate(products: &[Product]) -> Option<StockAggregate> {
    let (total_units, products_with_stock) = products
        .iter()
        .filter_map(|p| p.stock)
        .fold((0u64, 0usize), |(total, count), stock| (total + u64::from(stock), count + 1));

    if products_with_stock == 0 {
        return None;
    }
    Some(StockAggregate {
        total_units,
        products_with_stock,
    })
}

// --- 3. Estoque baixo ---
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock()).collect()
}

// --- 4. Rankings ---
// `sort_by_key` é estável: empates mantêm a ordem da coleção.
pub fn highest_stock(products: &[Product], limit: usize) -> Vec<&Product> {
    let mut ranked: Vec<(&Product, u32)> = products
        .iter()
        .filter_map(|p| p.stock.map(|stock| (p, stock)))
        .collect();
    ranked.sort_by_key(|&(_, stock)| std::cmp::Reverse(stock));
    ranked.into_iter().take(limit).map(|(p, _)| p).collect()
}

// Zerados ficam de fora.
pub fn lowest_stock(products: &[Product], limit: usize) -> Vec<&Product> {
    let mut ranked: Vec<(&Product, u32)> = products
        .iter()
        .filter_map(|p| p.stock.filter(|&stock| stock > 0).map(|stock| (p, stock)))
        .collect();
    ranked.sort_by_key(|&(_, stock)| stock);
    ranked.into_iter().take(limit).map(|(p, _)| p).collect()
}

// --- 5. Departamento com maior estoque médio ---
pub fn highest_average_department(products: &[Product]) -> Option<DepartmentAverage> {
    let with_stock = products.iter().filter(|p| p.stock.is_some());
    let groups = group_by_department(with_stock, |acc: &mut (u64, usize), p| {
        acc.0 += u64::from(p.stock.unwrap_or_default());
        acc.1 += 1;
    });

    let mut best: Option<DepartmentAverage> = None;
    for (department, (total, count)) in groups {
        let average = Decimal::from(total) / Decimal::from(count);
        // Estritamente maior: no empate fica o primeiro departamento encontrado
        if best.as_ref().is_none_or(|b| average > b.average) {
            best = Some(DepartmentAverage {
                department: department.to_string(),
                average,
                products: count,
            });
        }
    }
    best
}

// --- 6. Painel completo ---
pub fn inventory_analysis(products: &[Product]) -> Option<InventoryAnalysis<'_>> {
    let stock = stock_aggregate(products)?;
    Some(InventoryAnalysis {
        stock,
        low_stock: low_stock(products),
        highest_stock: highest_stock(products, RANKING_SIZE),
        lowest_stock: lowest_stock(products, RANKING_SIZE),
        highest_average_department: highest_average_department(products),
    })
}

// --- 7. Resumo ---
pub fn summary(products: &[Product]) -> InventorySummary {
    InventorySummary {
        total_products: products.len(),
        departments: products
            .iter()
            .map(|p| p.department.as_str())
            .collect::<HashSet<_>>()
            .len(),
        last_updated: products.iter().map(|p| p.updated_at).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inventory::ProductFormData;
    use chrono::Utc;

    fn product(name: &str, department: &str, stock: Option<u32>, min_stock: Option<u32>) -> Product {
        Product::new(
            ProductFormData {
                code: format!("C-{name}"),
                name: name.into(),
                price: Decimal::ONE,
                department: department.into(),
                notes: None,
                stock,
                min_stock,
            },
            Utc::now(),
        )
    }

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn empty_collection_has_no_data_anywhere() {
        let empty: Vec<Product> = Vec::new();
        assert!(department_distribution(&empty).is_empty());
        assert_eq!(stock_aggregate(&empty), None);
        assert!(low_stock(&empty).is_empty());
        assert!(highest_stock(&empty, RANKING_SIZE).is_empty());
        assert!(lowest_stock(&empty, RANKING_SIZE).is_empty());
        assert_eq!(highest_average_department(&empty), None);
        assert_eq!(inventory_analysis(&empty), None);
        assert_eq!(
            summary(&empty),
            InventorySummary { total_products: 0, departments: 0, last_updated: None }
        );
    }

    #[test]
    fn products_without_stock_are_insufficient_data() {
        let products = vec![product("a", "A", None, Some(3)), product("b", "B", None, None)];
        assert_eq!(stock_aggregate(&products), None);
        assert_eq!(highest_average_department(&products), None);
        assert_eq!(inventory_analysis(&products), None);
        assert_eq!(department_distribution(&products).len(), 2);
    }

    #[test]
    fn distribution_counts_in_first_seen_order() {
        let products = vec![
            product("1", "A", None, None),
            product("2", "B", None, None),
            product("3", "A", None, None),
        ];
        let shares = department_distribution(&products);

        assert_eq!(shares.len(), 2);
        assert_eq!((shares[0].department.as_str(), shares[0].count), ("A", 2));
        assert_eq!((shares[1].department.as_str(), shares[1].count), ("B", 1));
        assert_eq!(shares[0].percentage, Decimal::from(67));
        assert_eq!(shares[1].percentage, Decimal::from(33));
    }

    #[test]
    fn stock_aggregate_ignores_products_without_stock() {
        let products = vec![
            product("a", "A", Some(10), None),
            product("b", "A", None, None),
            product("c", "B", Some(0), None),
        ];
        assert_eq!(
            stock_aggregate(&products),
            Some(StockAggregate { total_units: 10, products_with_stock: 2 })
        );
    }

    #[test]
    fn low_stock_is_strict() {
        let products = vec![
            product("equal", "A", Some(5), Some(5)),
            product("below", "A", Some(4), Some(5)),
            product("no-min", "A", Some(5), None),
        ];
        assert_eq!(names(&low_stock(&products)), vec!["below"]);
    }

    #[test]
    fn rankings_are_stable_and_lowest_skips_zero() {
        let products = vec![
            product("a", "A", Some(5), None),
            product("b", "A", Some(9), None),
            product("c", "A", Some(5), None),
            product("d", "A", Some(0), None),
            product("e", "A", None, None),
            product("f", "A", Some(1), None),
        ];

        assert_eq!(names(&highest_stock(&products, 3)), vec!["b", "a", "c"]);
        assert_eq!(names(&lowest_stock(&products, 3)), vec!["f", "a", "c"]);
        assert_eq!(highest_stock(&products, 10).len(), 5);
    }

    #[test]
    fn highest_average_department_uses_stocked_products_only() {
        let products = vec![
            product("x1", "X", Some(10), None),
            product("y1", "Y", Some(5), None),
            product("x2", "X", Some(20), None),
            product("z1", "Z", None, None),
        ];
        let best = highest_average_department(&products).expect("department");

        assert_eq!(best.department, "X");
        assert_eq!(best.average, Decimal::from(15));
        assert_eq!(best.products, 2);
    }

    #[test]
    fn average_tie_keeps_first_department() {
        let products = vec![
            product("b", "B", Some(4), None),
            product("a", "A", Some(4), None),
        ];
        assert_eq!(highest_average_department(&products).unwrap().department, "B");
    }

    #[test]
    fn all_zero_stock_still_reports_a_department() {
        let products = vec![product("a", "A", Some(0), None)];
        let best = highest_average_department(&products).unwrap();
        assert_eq!((best.department.as_str(), best.average), ("A", Decimal::ZERO));
    }

    #[test]
    fn summary_counts_distinct_departments_and_latest_update() {
        let mut products = vec![
            product("a", "A", None, None),
            product("b", "B", None, None),
            product("c", "A", None, None),
        ];
        let latest = products[0].updated_at + chrono::Duration::minutes(5);
        products[1].updated_at = latest;

        let s = summary(&products);
        assert_eq!(s.total_products, 3);
        assert_eq!(s.departments, 2);
        assert_eq!(s.last_updated, Some(latest));
    }

    #[test]
    fn analysis_bundles_every_panel() {
        let products = vec![
            product("a", "A", Some(2), Some(3)),
            product("b", "B", Some(8), Some(1)),
        ];
        let analysis = inventory_analysis(&products).expect("analysis");

        assert_eq!(analysis.stock.total_units, 10);
        assert_eq!(names(&analysis.low_stock), vec!["a"]);
        assert_eq!(names(&analysis.highest_stock), vec!["b", "a"]);
        assert_eq!(names(&analysis.lowest_stock), vec!["a", "b"]);
        assert_eq!(analysis.highest_average_department.unwrap().department, "B");
    }
}

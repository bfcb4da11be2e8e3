//! Plain-text renderings of the listing and detail views.

use std::io::{self, Write};

use client_core::{DetailProps, StoreState, ROUTES};
use shared::domain::OperatorRecord;

const MISSING: &str = "-";

pub fn render_routes(out: &mut impl Write) -> io::Result<()> {
    for route in ROUTES {
        writeln!(out, "{:<8} {:<14} {:?}", route.name, route.pattern, route.view)?;
    }
    Ok(())
}

pub fn render_listing(state: &StoreState, out: &mut impl Write) -> io::Result<()> {
    if let Some(error) = &state.error {
        writeln!(out, "{error}")?;
    }
    if state.records.is_empty() {
        writeln!(out, "Nenhuma operadora encontrada.")?;
    } else {
        writeln!(
            out,
            "{:<20} {:<50} {:<4} {}",
            "CNPJ", "RAZÃO SOCIAL", "UF", "MODALIDADE"
        )?;
        for record in &state.records {
            render_row(record, out)?;
        }
    }

    let pages = state.total.div_ceil(u64::from(state.limit.max(1))).max(1);
    writeln!(
        out,
        "Página {} de {} ({} operadoras)",
        state.page, pages, state.total
    )
}

fn render_row(record: &OperatorRecord, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{:<20} {:<50} {:<4} {}",
        record.cnpj().unwrap_or(MISSING),
        record.razao_social().unwrap_or(MISSING),
        record.uf().unwrap_or(MISSING),
        record.modalidade().unwrap_or(MISSING)
    )
}

pub fn render_statistics(state: &StoreState, out: &mut impl Write) -> io::Result<()> {
    match &state.statistics {
        Some(statistics) => {
            let pretty = serde_json::to_string_pretty(statistics.as_value())
                .map_err(io::Error::other)?;
            writeln!(out, "{pretty}")
        }
        None => writeln!(out, "Estatísticas indisponíveis."),
    }
}

pub fn render_detail(
    props: &DetailProps,
    state: &StoreState,
    out: &mut impl Write,
) -> io::Result<()> {
    let detail = &state.detail;
    if let Some(error) = &detail.error {
        writeln!(out, "{error}")?;
    }

    if let Some(operator) = &detail.operator {
        writeln!(out, "CNPJ:         {}", operator.cnpj().unwrap_or(&props.identifier))?;
        writeln!(
            out,
            "Razão social: {}",
            operator.razao_social().unwrap_or(MISSING)
        )?;
        writeln!(
            out,
            "Registro ANS: {}",
            operator.registro_ans().unwrap_or(MISSING)
        )?;
        writeln!(out, "Modalidade:   {}", operator.modalidade().unwrap_or(MISSING))?;
        writeln!(out, "UF:           {}", operator.uf().unwrap_or(MISSING))?;
    }

    if detail.expenses.is_empty() {
        return writeln!(out, "Sem despesas registradas.");
    }
    writeln!(out, "Despesas:")?;
    for expense in &detail.expenses {
        let valor = expense
            .valor()
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| MISSING.to_string());
        writeln!(
            out,
            "  {:<12} {valor:>16}",
            expense.data_referencia().unwrap_or(MISSING)
        )?;
    }
    Ok(())
}

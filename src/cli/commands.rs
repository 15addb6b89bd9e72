use std::{fmt, path::PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm};
use fintrack_core::{
    charts::CASH_FLOW_DAYS, format_axis_thousands, format_currency, format_share, ChartSelection,
    DayTotals, DefaultTooltip, GroupKey, SeriesKind, Totals, TooltipFormatter,
};
use fintrack_domain::{
    is_suggested_category, Language, NewTransaction, Transaction, TransactionKind,
    TransactionPatch, YearMonth, SUGGESTED_CATEGORIES,
};
use uuid::Uuid;

use super::{
    args::{parse_amount, parse_date, ParsedArgs},
    output,
};
use crate::{errors::CliError, utils::build_info, FinanceTracker};

const IMPORT_PREVIEW_ROWS: usize = 5;
const IMPORT_ERROR_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    List,
    Add,
    Edit,
    Remove,
    Clear,
    Import,
    Export,
    Template,
    Summary,
    Calendar,
    Day,
    Charts,
    Categories,
}

impl Command {
    pub const ALL: [Command; 15] = [
        Command::Help,
        Command::Version,
        Command::List,
        Command::Add,
        Command::Edit,
        Command::Remove,
        Command::Clear,
        Command::Import,
        Command::Export,
        Command::Template,
        Command::Summary,
        Command::Calendar,
        Command::Day,
        Command::Charts,
        Command::Categories,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Version => "version",
            Command::List => "list",
            Command::Add => "add",
            Command::Edit => "edit",
            Command::Remove => "remove",
            Command::Clear => "clear",
            Command::Import => "import",
            Command::Export => "export",
            Command::Template => "template",
            Command::Summary => "summary",
            Command::Calendar => "calendar",
            Command::Day => "day",
            Command::Charts => "charts",
            Command::Categories => "categories",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Command::ALL.into_iter().find(|command| command.name() == name)
    }

    /// Commands that never touch the data directory.
    pub fn is_static(self) -> bool {
        matches!(self, Command::Help | Command::Version)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn print_usage() {
    println!(
        "Usage: fintrack_cli <command> [arguments] [flags]\n\
         Commands:\n  \
         list                                   list transactions, newest first\n  \
         add <date> <amount> <description> <category> <income|expense>\n  \
         edit <id> <date|amount|description|category|type> <value>\n  \
         remove <id>\n  \
         clear [--yes]                          delete every transaction\n  \
         import <file.csv> [--yes]              validate, preview and import a CSV\n  \
         export [--dir <path>]                  write all transactions to CSV\n  \
         template [--dir <path>]                write an example import file\n  \
         summary                                current month cards and recent entries\n  \
         calendar [YYYY-MM]                     month grid with daily balances\n  \
         day <date>                             entries recorded on one date\n  \
         charts [year] [--month <1-12>]         yearly evolution and category shares\n  \
         categories                             suggested and used categories\n  \
         version\n\
         Filters (list, summary, calendar, day, charts):\n  \
         --period all|current-month|current-year|last-30-days|last-90-days|custom\n  \
         --from <date> --to <date> --category <name> --type income|expense --search <text>\n\
         Dates are dd/mm/yyyy or yyyy-mm-dd."
    );
}

pub fn dispatch(
    command: Command,
    args: &ParsedArgs,
    tracker: &mut FinanceTracker,
) -> Result<(), CliError> {
    match command {
        Command::Help | Command::Version => {
            dispatch_static(command);
            Ok(())
        }
        Command::List => list(args, tracker),
        Command::Add => add(args, tracker),
        Command::Edit => edit(args, tracker),
        Command::Remove => remove(args, tracker),
        Command::Clear => clear(args, tracker),
        Command::Import => import(args, tracker),
        Command::Export => export(args, tracker),
        Command::Template => template(args, tracker),
        Command::Summary => summary(args, tracker),
        Command::Calendar => calendar(args, tracker),
        Command::Day => day(args, tracker),
        Command::Charts => charts(args, tracker),
        Command::Categories => categories(tracker),
    }
}

/// Handles the commands that need no tracker.
pub fn dispatch_static(command: Command) {
    match command {
        Command::Version => println!("{}", build_info::current().describe()),
        _ => print_usage(),
    }
}

fn confirm(args: &ParsedArgs, prompt: &str) -> Result<bool, CliError> {
    if args.assume_yes {
        return Ok(true);
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn categories(tracker: &FinanceTracker) -> Result<(), CliError> {
    output::section("Suggested");
    output::info(SUGGESTED_CATEGORIES.join(", "));
    let custom: Vec<String> = tracker
        .store()
        .categories()
        .into_iter()
        .filter(|name| !is_suggested_category(name))
        .collect();
    if !custom.is_empty() {
        output::section("Custom");
        output::info(custom.join(", "));
    }
    Ok(())
}

fn list(args: &ParsedArgs, tracker: &FinanceTracker) -> Result<(), CliError> {
    let criteria = args.filter_criteria()?;
    let rows = fintrack_core::recent(&tracker.filtered(&criteria), usize::MAX);
    let language = tracker.language();
    if rows.is_empty() {
        output::info("No transactions found.");
        return Ok(());
    }
    for txn in &rows {
        output::info(output::transaction_row(txn, language));
    }
    output::info(format!(
        "{} of {} transaction(s)",
        rows.len(),
        tracker.store().len()
    ));
    Ok(())
}

fn parse_kind(raw: &str, tracker: &FinanceTracker) -> Result<TransactionKind, CliError> {
    raw.parse::<TransactionKind>()
        .ok()
        .or_else(|| TransactionKind::from_label(raw, tracker.language()))
        .ok_or_else(|| CliError::Input(format!("invalid type `{raw}` (use income or expense)")))
}

fn add(args: &ParsedArgs, tracker: &mut FinanceTracker) -> Result<(), CliError> {
    let date = parse_date(args.require(0, "date")?)?;
    let amount = parse_amount(args.require(1, "amount")?)?;
    let description = args.require(2, "description")?;
    let category = args.require(3, "category")?;
    let kind = parse_kind(args.require(4, "type")?, tracker)?;

    let txn = tracker.add(NewTransaction::new(date, amount, description, category, kind))?;
    output::success(format!(
        "Added {}",
        output::transaction_row(&txn, tracker.language())
    ));
    Ok(())
}

/// Full id, or a prefix matching exactly one stored transaction.
fn resolve_id(raw: &str, tracker: &FinanceTracker) -> Result<Uuid, CliError> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(id);
    }
    let needle = raw.trim().to_ascii_lowercase();
    let matches: Vec<&Transaction> = tracker
        .store()
        .transactions()
        .iter()
        .filter(|txn| !needle.is_empty() && txn.id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [txn] => Ok(txn.id),
        [] => Err(CliError::Input(format!("no transaction matches `{raw}`"))),
        _ => Err(CliError::Input(format!("`{raw}` matches several transactions"))),
    }
}

fn edit(args: &ParsedArgs, tracker: &mut FinanceTracker) -> Result<(), CliError> {
    let id = resolve_id(args.require(0, "transaction id")?, tracker)?;
    let field = args.require(1, "field")?;
    let value = args.require(2, "value")?;

    let mut patch = TransactionPatch::default();
    match field {
        "date" => patch.date = Some(parse_date(value)?),
        "amount" => patch.amount = Some(parse_amount(value)?),
        "description" => patch.description = Some(value.to_string()),
        "category" => patch.category = Some(value.to_string()),
        "type" => patch.kind = Some(parse_kind(value, tracker)?),
        other => return Err(CliError::Input(format!("unknown field `{other}`"))),
    }

    match tracker.update(id, patch)? {
        Some(txn) => output::success(format!(
            "Updated {}",
            output::transaction_row(&txn, tracker.language())
        )),
        None => output::warning(format!("Transaction {id} not found.")),
    }
    Ok(())
}

fn remove(args: &ParsedArgs, tracker: &mut FinanceTracker) -> Result<(), CliError> {
    let id = resolve_id(args.require(0, "transaction id")?, tracker)?;
    match tracker.remove(id)? {
        Some(txn) => output::success(format!("Removed {}", txn.description)),
        None => output::warning(format!("Transaction {id} not found.")),
    }
    Ok(())
}

fn clear(args: &ParsedArgs, tracker: &mut FinanceTracker) -> Result<(), CliError> {
    let count = tracker.store().len();
    if count == 0 {
        output::info("Nothing to clear.");
        return Ok(());
    }
    if !confirm(args, &format!("Delete all {count} transaction(s)?"))? {
        output::info("Clear cancelled.");
        return Ok(());
    }
    tracker.clear()?;
    output::success(format!("Removed {count} transaction(s)."));
    Ok(())
}

fn import(args: &ParsedArgs, tracker: &mut FinanceTracker) -> Result<(), CliError> {
    let path = PathBuf::from(args.require(0, "CSV file")?);
    let pending = tracker.preview_import(&path);
    let result = pending.result();
    let language = tracker.language();

    output::section("Import preview");
    output::info(format!(
        "{} valid, {} duplicate(s), {} error(s)",
        result.success(),
        result.duplicates,
        result.errors.len()
    ));
    if result.has_errors() {
        for message in result.messages().iter().take(IMPORT_ERROR_LINES) {
            output::warning(message);
        }
        if result.errors.len() > IMPORT_ERROR_LINES {
            output::warning(format!(
                "... and {} more error(s)",
                result.errors.len() - IMPORT_ERROR_LINES
            ));
        }
    }
    for row in result.preview(IMPORT_PREVIEW_ROWS) {
        output::info(format!(
            "  {}  {:<8} {:<16} {}  {}",
            fintrack_core::format_display_date(row.date, language),
            row.kind.label(language),
            row.category,
            row.description,
            output::signed_amount(row.amount, row.kind, language)
        ));
    }
    let remaining = result.remaining_after_preview(IMPORT_PREVIEW_ROWS);
    if remaining > 0 {
        output::info(format!("  ... and {remaining} more"));
    }

    if result.success() == 0 {
        output::warning("No valid transactions to import.");
        pending.discard();
        return Ok(());
    }
    if !confirm(args, &format!("Import {} transaction(s)?", result.success()))? {
        pending.discard();
        output::info("Import cancelled.");
        return Ok(());
    }
    let added = tracker.confirm_import(pending)?;
    output::success(format!("Imported {} transaction(s).", added.len()));
    Ok(())
}

fn target_dir(args: &ParsedArgs, tracker: &FinanceTracker) -> PathBuf {
    args.option("dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| tracker.export_dir())
}

fn export(args: &ParsedArgs, tracker: &FinanceTracker) -> Result<(), CliError> {
    if tracker.store().is_empty() {
        output::warning("No transactions to export.");
        return Ok(());
    }
    let path = tracker.export_to(&target_dir(args, tracker))?;
    output::success(format!("Exported to {}", path.display()));
    Ok(())
}

fn template(args: &ParsedArgs, tracker: &FinanceTracker) -> Result<(), CliError> {
    let path = tracker.write_template(&target_dir(args, tracker))?;
    output::success(format!("Template written to {}", path.display()));
    Ok(())
}

fn summary(args: &ParsedArgs, tracker: &FinanceTracker) -> Result<(), CliError> {
    let criteria = args.filter_criteria()?;
    let board = tracker.dashboard(&criteria);
    let language = tracker.language();

    output::section(format!(
        "{} {}",
        language.month_name(board.month.month()),
        board.month.year()
    ));
    output::info(format!(
        "{:<10} {}",
        language.income_label(),
        format_currency(board.overview.income, language)
    ));
    output::info(format!(
        "{:<10} {}",
        language.expense_label(),
        format_currency(board.overview.expense, language)
    ));
    output::info(format!(
        "{:<10} {}",
        balance_label(language),
        output::balance(board.overview.balance(), language)
    ));
    if board.active_filters > 0 {
        output::info(format!(
            "{} filter(s) active, {} transaction(s) visible",
            board.active_filters, board.visible
        ));
    }

    output::section("Recent");
    if board.recent.is_empty() {
        output::info("No transactions yet.");
    }
    for txn in &board.recent {
        output::info(output::transaction_row(txn, language));
    }
    Ok(())
}

fn balance_label(language: Language) -> &'static str {
    match language {
        Language::Portuguese => "Saldo",
        Language::English => "Balance",
    }
}

fn calendar(args: &ParsedArgs, tracker: &FinanceTracker) -> Result<(), CliError> {
    let criteria = args.filter_criteria()?;
    let month = match args.positional(0) {
        Some(raw) => raw.parse::<YearMonth>().map_err(CliError::Input)?,
        None => YearMonth::of(tracker.today()),
    };
    let grid = tracker.calendar(month, &criteria);
    let language = tracker.language();

    output::section(format!(
        "{} {}",
        language.month_name(month.month()),
        month.year()
    ));
    output::info(" Su  Mo  Tu  We  Th  Fr  Sa");
    for week in grid.weeks() {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                None => "    ".to_string(),
                Some(day) => {
                    let marker = if day.is_today {
                        '>'
                    } else if day.has_transactions() {
                        '*'
                    } else {
                        ' '
                    };
                    format!("{marker}{:>2} ", chrono::Datelike::day(&day.date))
                }
            })
            .collect();
        output::info(line.trim_end());
    }

    for day in grid.days.iter().filter(|day| day.has_transactions()) {
        output::info(format!(
            "{}  {}",
            fintrack_core::format_display_date(day.date, language),
            output::balance(day.totals.balance(), language)
        ));
    }
    let totals = grid.month_totals();
    output::info(format!(
        "Month: {} in, {} out, balance {}",
        format_currency(totals.income, language),
        format_currency(totals.expense, language),
        output::balance(totals.balance(), language)
    ));
    Ok(())
}

fn day(args: &ParsedArgs, tracker: &FinanceTracker) -> Result<(), CliError> {
    let date = parse_date(args.require(0, "date")?)?;
    let criteria = args.filter_criteria()?;
    let details = tracker.day_details(date, &criteria);
    let language = tracker.language();

    output::section(fintrack_core::format_display_date(date, language));
    if details.is_empty() {
        output::info("No transactions on this date.");
        return Ok(());
    }
    for txn in details.income.iter().chain(details.expenses.iter()) {
        output::info(output::transaction_row(txn, language));
    }
    output::info(format!(
        "Balance: {}",
        output::balance(details.totals.balance(), language)
    ));
    Ok(())
}

fn charts(args: &ParsedArgs, tracker: &FinanceTracker) -> Result<(), CliError> {
    let criteria = args.filter_criteria()?;
    let today = tracker.today();
    let year = match args.positional(0) {
        Some(raw) => raw
            .parse::<i32>()
            .map_err(|_| CliError::Input(format!("invalid year `{raw}`")))?,
        None => chrono::Datelike::year(&today),
    };
    let month = args
        .option("month")
        .map(|raw| match raw.parse::<u32>() {
            Ok(month @ 1..=12) => Ok(month),
            _ => Err(CliError::Input(format!("invalid month `{raw}`"))),
        })
        .transpose()?;

    let report = tracker.charts(ChartSelection::new(year, month), &criteria);
    let language = tracker.language();
    let tooltip = DefaultTooltip::new(language);

    if !report.has_data {
        output::info("No transactions to chart yet.");
        return Ok(());
    }

    output::section(format!("Evolution {year}"));
    for point in &report.evolution {
        let text = tooltip.format(
            SeriesKind::Evolution,
            &GroupKey::Month(point.month),
            &point.totals,
        );
        output::info(text.replace('\n', "  "));
    }

    let summary = &report.year_summary;
    output::section("Year summary");
    output::info(format!(
        "Total balance {}, monthly average {}",
        output::balance(summary.totals.balance(), language),
        format_currency(summary.average_balance, language)
    ));
    if let Some(best) = summary.best_month {
        output::info(format!(
            "Best month: {} ({})",
            language.month_name(best.month.month()),
            format_currency(best.totals.balance(), language)
        ));
    }

    output::section("Trend");
    for point in &report.trend {
        let text = tooltip.format(SeriesKind::Trend, &GroupKey::Month(point.month), &point.totals);
        output::info(text.replace('\n', "  "));
    }

    output::section(format!("Last {CASH_FLOW_DAYS} days"));
    print_cash_flow(&tooltip, &report.recent_days, language);

    if let Some(month) = month {
        output::section(format!(
            "Daily cash flow {} {year}",
            language.month_name(month)
        ));
        print_cash_flow(&tooltip, &report.daily_cash_flow, language);
    }

    output::section("Categories");
    for row in &report.categories.rows {
        let totals = Totals {
            income: row.income,
            expense: row.expense,
            ..Totals::default()
        };
        let text = tooltip.format(
            SeriesKind::CategoryPie,
            &GroupKey::Category(row.category.clone()),
            &totals,
        );
        output::info(format!(
            "{}  ({})",
            text.replace('\n', "  "),
            format_share(report.categories.share(row))
        ));
    }

    if !report.top_expenses.is_empty() {
        output::section("Top expenses");
        for (category, amount) in &report.top_expenses {
            output::info(format!(
                "{category:<16} {}",
                format_currency(*amount, language)
            ));
        }
    }
    Ok(())
}

/// Days with activity, followed by the net flow and the busiest day.
fn print_cash_flow(tooltip: &DefaultTooltip, days: &[DayTotals], language: Language) {
    let active: Vec<&DayTotals> = days.iter().filter(|day| !day.totals.is_empty()).collect();
    if active.is_empty() {
        output::info("No activity in this period.");
        return;
    }
    for day in &active {
        let text = tooltip.format(SeriesKind::DailyCashFlow, &GroupKey::Day(day.date), &day.totals);
        output::info(text.replace('\n', "  "));
    }
    let net: f64 = active.iter().map(|day| day.totals.balance()).sum();
    let peak = active
        .iter()
        .map(|day| day.totals.income.max(day.totals.expense))
        .fold(0.0, f64::max);
    output::info(format!(
        "Net {}, peak day {}",
        output::balance(net, language),
        format_axis_thousands(peak, language)
    ));
}

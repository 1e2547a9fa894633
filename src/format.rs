//! Chat message text for form submissions
//!
//! Messages go out with `parse_mode=HTML`, so every user-supplied field is
//! passed through [`escape_html`].

use chrono::{DateTime, FixedOffset};
use std::fmt::Write;

use crate::form::{CalculatorSnapshot, FormKind, FormSubmission};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Thousands separator used by Russian number formatting (no-break space)
const GROUP_SEPARATOR: char = '\u{a0}';

fn title(kind: &FormKind) -> &'static str {
    match kind {
        FormKind::Estimate { .. } => "📊 Новая заявка: Рассчитать стоимость ремонта",
        FormKind::Engineer => "🔧 Новая заявка: Вызвать инженера на объект",
        FormKind::Calculator { .. } => "🧮 Новая заявка: Заказ сметы из калькулятора",
        FormKind::Contact => "📞 Новая заявка: Форма обратной связи",
    }
}

/// Render a submission into the notification text
pub fn format_submission(form: &FormSubmission, at: DateTime<FixedOffset>) -> String {
    let mut message = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(message, "{}", title(&form.kind));
    let _ = writeln!(message, "{}", SEPARATOR);
    let _ = writeln!(message, "⏰ Дата и время: {}", format_timestamp(at));
    message.push('\n');

    let _ = writeln!(message, "👤 Имя: {}", escape_html(&form.name));
    let _ = writeln!(message, "📱 Телефон: {}", escape_html(&form.phone));

    if let FormKind::Estimate { area: Some(area) } = &form.kind {
        if !area.trim().is_empty() {
            let _ = writeln!(message, "📐 Площадь: {} м²", escape_html(area.trim()));
        }
    }

    if let Some(calc) = form.calculator_data() {
        write_calculator_section(&mut message, calc);
    }

    if let Some(comment) = form.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        let _ = writeln!(message, "\n💬 Комментарий: {}", escape_html(comment));
    }

    message.push_str(SEPARATOR);
    message
}

fn write_calculator_section(message: &mut String, calc: &CalculatorSnapshot) {
    let _ = writeln!(message, "\n📋 Данные калькулятора:");
    let _ = writeln!(message, "   • Площадь: {} м²", calc.area);
    let _ = writeln!(
        message,
        "   • Тип жилья: {}",
        if calc.is_new_build { "Новостройка" } else { "Вторичное" }
    );
    if calc.has_design_project {
        let _ = writeln!(message, "   • Дизайн-проект: ✅ Включен");
    }
    if calc.needs_demolition {
        let _ = writeln!(message, "   • Демонтаж: ✅ Требуется");
    }

    let _ = writeln!(message, "\n💰 Предварительная стоимость:");
    let _ = writeln!(message, "   • Работы: {} ₽", format_rubles(calc.total_work));
    let _ = writeln!(message, "   • Материалы: {} ₽", format_rubles(calc.total_materials));
    if calc.total_design > 0 {
        let _ = writeln!(message, "   • Дизайн: {} ₽", format_rubles(calc.total_design));
    }
    let _ = writeln!(message, "   • ИТОГО: {} ₽", format_rubles(calc.total));
}

/// `16.10.2026, 14:05`
pub fn format_timestamp(at: DateTime<FixedOffset>) -> String {
    at.format("%d.%m.%Y, %H:%M").to_string()
}

/// `16.10.2026`
pub fn format_date(at: DateTime<FixedOffset>) -> String {
    at.format("%d.%m.%Y").to_string()
}

/// Group digits by thousands: `1350000` -> `1 350 000`
pub fn format_rubles(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Escape the characters Telegram's HTML parse mode treats as markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

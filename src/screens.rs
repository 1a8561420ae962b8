//! Message texts and keyboards for each step of the bot.

use teloxide::types::{KeyboardButton, KeyboardMarkup};
use teloxide::utils::html::escape;

use crate::quiz::catalog::{Catalog, Question};
use crate::quiz::chart::{ChartRenderer, RadarChart, TextBarRenderer};
use crate::quiz::content::{DISCLAIMER, EXPERT};
use crate::quiz::navigator::Navigator;
use crate::quiz::persona::Persona;
use crate::quiz::report::SettledReport;
use crate::quiz::scoring::ScoreSummary;

pub const START_BUTTON: &str = "啟動深度分析";
pub const ENTER_BUTTON: &str = "進入測驗";
pub const NEXT_BUTTON: &str = "下一題";
pub const PREVIOUS_BUTTON: &str = "上一題";
pub const RESTART_BUTTON: &str = "重新測驗";

/// The persona that already has what the coaching course sells.
pub const TOP_PERSONA_ID: &str = "charmer";

const PROGRESS_WIDTH: usize = 16;

pub fn hero_text() -> String {
    [
        "<b>脫單力檢核分析</b>",
        "快速找出你的脫單阻礙",
        "",
        "✨ <b>魅力原型</b>：分析你在戀愛市場中的真實定位",
        "📊 <b>多維雷達</b>：將外型、社交、心態數據化呈現",
        "🌱 <b>進化指南</b>：獲得個人深度報告與建議",
    ]
    .join("\n")
}

pub fn hero_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(START_BUTTON)]])
}

pub fn restart_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(RESTART_BUTTON)]])
}

pub fn progress_bar(done: usize, total: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        done.min(total) * PROGRESS_WIDTH / total
    };
    format!(
        "{}{} {}/{}",
        "▓".repeat(filled),
        "░".repeat(PROGRESS_WIDTH - filled),
        done,
        total
    )
}

/// Intro screen or question screen for the navigator's current position.
pub fn quiz_screen(navigator: &Navigator, catalog: &Catalog) -> Option<(String, KeyboardMarkup)> {
    let question = catalog.get(navigator.current_index())?;
    let bar = progress_bar(navigator.completed_steps(), navigator.len());

    if navigator.is_intro() {
        let text = format!(
            "<b>{}</b>\n\n{}\n\n{}",
            question.category.label(),
            escape(question.category.description()),
            bar
        );
        let keyboard = KeyboardMarkup::new(vec![
            vec![KeyboardButton::new(ENTER_BUTTON)],
            vec![KeyboardButton::new(PREVIOUS_BUTTON)],
        ]);
        return Some((text, keyboard));
    }

    Some((question_text(navigator, catalog, question, &bar), question_keyboard(catalog)))
}

fn question_text(navigator: &Navigator, catalog: &Catalog, question: &Question, bar: &str) -> String {
    let mut text = format!(
        "<b>第 {} / {} 題 · {}</b>\n{}\n\n{}",
        navigator.current_index() + 1,
        navigator.len(),
        question.category.label(),
        bar,
        escape(&question.text)
    );
    let chosen = navigator
        .answers()
        .get(question.id)
        .and_then(|value| catalog.option_by_value(value));
    if let Some(option) = chosen {
        text.push_str(&format!("\n\n目前選擇：{}", option.label));
    }
    text
}

fn question_keyboard(catalog: &Catalog) -> KeyboardMarkup {
    let mut rows = catalog
        .options()
        .iter()
        .map(|option| vec![KeyboardButton::new(option.label)])
        .collect::<Vec<_>>();
    rows.push(vec![
        KeyboardButton::new(PREVIOUS_BUTTON),
        KeyboardButton::new(NEXT_BUTTON),
    ]);
    KeyboardMarkup::new(rows)
}

/// The result screen, split into chat-sized messages.
pub fn result_messages(
    summary: &ScoreSummary,
    settled: &SettledReport,
    persona: &Persona,
    chart_max: u32,
) -> Vec<String> {
    let report = &settled.report;

    let mut card = format!(
        "<b>{}</b>\n<i>{}</i>\n\n{}\n\n{}\n\n{}\n\n{}",
        persona.title,
        persona.subtitle,
        persona.description,
        persona
            .tags
            .iter()
            .map(|tag| format!("#{}", tag))
            .collect::<Vec<_>>()
            .join(" "),
        escape(&report.persona_overview),
        escape(&report.persona_explanation),
    );
    card.push_str(&format!(
        "\n\n<b>魅力雷達</b>（總分 {}）\n<pre>{}</pre>",
        summary.total,
        escape(&TextBarRenderer.render(&RadarChart::from_summary(summary, chart_max)))
    ));

    let dimensions = summary
        .dimensions
        .iter()
        .map(|d| {
            format!(
                "{} <b>{}</b>　{}（{}分）\n{}\n👉 {}\n💬 {}",
                d.level.emoji(),
                d.category.label(),
                d.level.label(),
                d.score,
                d.description,
                d.suggestion,
                escape(report.analysis_for(d.category))
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut closing = format!(
        "<b>{}的總結建議</b>\n{}",
        EXPERT.name,
        escape(&report.coach_general_advice)
    );
    if persona.id == TOP_PERSONA_ID {
        closing.push_str(&format!("\n\n🏆 <b>你已是頂級魅力家</b>\n{}", EXPERT.top_persona_note));
    } else {
        closing.push_str(&format!(
            "\n\n<b>{}</b>\n{}\n\n👉 <a href=\"{}\">{}</a>",
            EXPERT.title, EXPERT.description, EXPERT.cta_url, EXPERT.cta_text
        ));
    }
    if settled.is_fallback() {
        closing.push_str("\n\n<i>⚠️ AI 暫時無法連線，以上為根據分數產生的基礎報告。</i>");
    }
    closing.push_str(&format!("\n\n<i>{}</i>", DISCLAIMER));

    vec![card, dimensions, closing]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::persona::PersonaTable;
    use crate::quiz::report::{FallbackPolicy, Report, ReportOrigin};
    use crate::quiz::scoring::summarize;
    use crate::quiz::AnswerSet;

    fn settled(persona: &str, origin: ReportOrigin) -> SettledReport {
        SettledReport {
            report: Report {
                selected_persona_id: persona.to_string(),
                persona_explanation: "why <this>".to_string(),
                persona_overview: "overview".to_string(),
                appearance_analysis: "appearance".to_string(),
                social_analysis: "social".to_string(),
                interaction_analysis: "interaction".to_string(),
                mindset_analysis: "mindset".to_string(),
                coach_general_advice: "advice".to_string(),
            },
            origin,
        }
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0, 16), format!("{} 0/16", "░".repeat(16)));
        assert_eq!(
            progress_bar(8, 16),
            format!("{}{} 8/16", "▓".repeat(8), "░".repeat(8))
        );
        assert_eq!(progress_bar(3, 0), format!("{} 3/0", "░".repeat(16)));
    }

    #[test]
    fn intro_then_question_screens() {
        let catalog = Catalog::builtin();
        let mut navigator = Navigator::new(&catalog);

        let (intro, _) = quiz_screen(&navigator, &catalog).unwrap();
        assert!(intro.starts_with("<b>形象外表</b>"));

        navigator.advance();
        navigator.record_answer(2).unwrap();
        let (question, _) = quiz_screen(&navigator, &catalog).unwrap();
        assert!(question.contains("第 1 / 16 題"));
        assert!(question.contains("目前選擇：有點符合"));
    }

    #[test]
    fn result_for_generated_report() {
        let catalog = Catalog::builtin();
        let summary = summarize(&AnswerSet::default(), &catalog);
        let personas = PersonaTable::builtin().unwrap();
        let persona = personas.resolve("sage");
        let messages = result_messages(&summary, &settled("sage", ReportOrigin::Generated), persona, 12);

        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("理論派大師"));
        assert!(messages[0].contains("why &lt;this&gt;"));
        assert!(messages[1].contains("紅燈（0分）"));
        assert!(messages[1].contains("💬 mindset"));
        assert!(messages[2].contains(&format!(
            "<a href=\"https://www.menspalais.com\">{}</a>",
            EXPERT.cta_text
        )));
        assert!(!messages[2].contains("⚠️"));
        assert!(messages[2].ends_with(&format!("<i>{}</i>", DISCLAIMER)));
    }

    #[test]
    fn top_persona_skips_the_sales_pitch() {
        let catalog = Catalog::builtin();
        let summary = summarize(&AnswerSet::default(), &catalog);
        let personas = PersonaTable::builtin().unwrap();
        let messages = result_messages(
            &summary,
            &settled("charmer", ReportOrigin::Generated),
            personas.resolve("charmer"),
            12,
        );
        assert!(!messages[2].contains(EXPERT.cta_text));
        assert!(!messages[2].contains(EXPERT.cta_url));
        assert!(messages[2].contains(EXPERT.top_persona_note));
        assert!(messages[2].contains(DISCLAIMER));
    }

    #[test]
    fn fallback_report_is_marked() {
        let catalog = Catalog::builtin();
        let summary = summarize(&AnswerSet::default(), &catalog);
        let fallback = SettledReport {
            report: FallbackPolicy::default().report(&summary),
            origin: ReportOrigin::Fallback("timed out".to_string()),
        };
        let personas = PersonaTable::builtin().unwrap();
        let persona = personas.resolve(&fallback.report.selected_persona_id);
        let messages = result_messages(&summary, &fallback, persona, 12);
        assert!(messages[0].contains("溫暖的鄰家男孩"));
        assert!(messages[2].contains("⚠️ AI 暫時無法連線"));
    }
}

mod config;
mod progress;
mod quiz;
mod screens;

use std::{fs::File, sync::Arc, time::Duration};

use chatgpt::client::ChatGPT;
use config::Config;
use dotenv::dotenv;
use log::{debug, error, info, warn};
use quiz::{
    ai_helper::QuizHelper,
    catalog::{Catalog, QUESTIONS_PER_BLOCK},
    coordinator::{Phase, ReportCoordinator, RequestOutcome},
    navigator::{Navigator, Transition},
    persona::PersonaTable,
    report::{OfflineGenerator, ReportGenerator, ReportRequest, SettledReport},
    scoring::{summarize, ScoreSummary},
    session::Sessions,
    MAX_ANSWER_VALUE,
};
use screens::{ENTER_BUTTON, NEXT_BUTTON, PREVIOUS_BUTTON, RESTART_BUTTON, START_BUTTON};
use teloxide::{
    dispatching::dialogue::{ErasedStorage, InMemStorage, Storage},
    prelude::*,
    types::{ChatAction, MessageId, ParseMode},
    utils::command::BotCommands,
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    Hero,
    Quiz {
        navigator: Navigator,
    },
    Diagnosing {
        navigator: Navigator,
    },
    Result {
        navigator: Navigator,
    },
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "可用指令：")]
enum Command {
    #[command(description = "回到首頁")]
    Start,
    #[command(description = "重新開始測驗")]
    Restart,
    #[command(description = "顯示這段說明")]
    Help,
}

type UserInfoStorage = std::sync::Arc<ErasedStorage<State>>;

/// Read-only tables and per-chat coordinators shared by every handler.
struct App {
    catalog: Catalog,
    personas: PersonaTable,
    sessions: Sessions,
    progress_tick: Duration,
}

impl App {
    /// Upper bound of a single category's score, for the chart axis.
    fn chart_max(&self) -> u32 {
        let per_category = quiz::catalog::Category::ALL
            .iter()
            .map(|c| self.catalog.in_category(*c).count())
            .max()
            .unwrap_or(QUESTIONS_PER_BLOCK);
        per_category as u32 * u32::from(MAX_ANSWER_VALUE)
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    pretty_env_logger::init();
    info!("Starting persona quiz bot...");

    let config = Config::from_env().expect("Invalid configuration");

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("Loading question catalog from {}", path.display());
            let file = File::open(path).expect("Failed to open catalog file");
            Catalog::from_file(file).expect("Invalid question catalog")
        }
        None => Catalog::builtin(),
    };
    info!("Catalog loaded with {} questions", catalog.len());

    let personas = PersonaTable::builtin().expect("Invalid persona table");

    let generator: Arc<dyn ReportGenerator> = match &config.chatgpt_api_key {
        Some(key) => {
            let gpt = {
                let mut gpt = ChatGPT::new(key.clone()).expect("Unable to connect with ChatGPT");

                gpt.config.engine = config.engine;
                gpt.config.timeout = config.report_timeout;

                gpt
            };
            Arc::new(QuizHelper::new(
                gpt,
                config.personality,
                personas.ids(),
                &config.fallback,
            ))
        }
        None => {
            warn!("CHATGPT_API_KEY is not set, every report will be the fallback report");
            Arc::new(OfflineGenerator)
        }
    };

    // Slightly longer than the client's own timeout so its error wins.
    let deadline = config.report_timeout + Duration::from_secs(5);
    let app = Arc::new(App {
        catalog,
        personas,
        sessions: Sessions::new(generator, config.fallback.clone(), deadline),
        progress_tick: config.progress_tick,
    });

    let bot = Bot::from_env();
    let storage: UserInfoStorage = InMemStorage::<State>::new().erase();

    let handler = Update::filter_message()
        .enter_dialogue::<Message, ErasedStorage<State>, State>()
        .branch(dptree::entry().filter_command::<Command>().endpoint(command))
        .branch(dptree::case![State::Start].endpoint(start))
        .branch(dptree::case![State::Hero].endpoint(hero))
        .branch(dptree::case![State::Quiz { navigator }].endpoint(quiz))
        .branch(dptree::case![State::Diagnosing { navigator }].endpoint(diagnosing))
        .branch(dptree::case![State::Result { navigator }].endpoint(result));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![storage, app])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn command(
    bot: Bot,
    dialogue: QuizDialogue,
    cmd: Command,
    app: Arc<App>,
    msg: Message,
) -> HandlerResult {
    match cmd {
        Command::Start => {
            app.sessions.abandon(msg.chat.id);
            show_hero(&bot, &dialogue, msg.chat.id).await
        }
        Command::Restart => begin_quiz(&bot, &dialogue, &app).await,
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
            Ok(())
        }
    }
}

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    show_hero(&bot, &dialogue, msg.chat.id).await
}

async fn show_hero(bot: &Bot, dialogue: &QuizDialogue, chat_id: ChatId) -> HandlerResult {
    bot.send_message(chat_id, screens::hero_text())
        .parse_mode(ParseMode::Html)
        .reply_markup(screens::hero_keyboard())
        .await?;

    dialogue.update(State::Hero).await?;
    Ok(())
}

async fn hero(bot: Bot, dialogue: QuizDialogue, app: Arc<App>, msg: Message) -> HandlerResult {
    match msg.text() {
        Some(START_BUTTON) => begin_quiz(&bot, &dialogue, &app).await,
        _ => {
            bot.send_message(msg.chat.id, format!("準備好了就按下「{}」", START_BUTTON))
                .reply_markup(screens::hero_keyboard())
                .await?;
            Ok(())
        }
    }
}

async fn begin_quiz(bot: &Bot, dialogue: &QuizDialogue, app: &App) -> HandlerResult {
    let (navigator, _) = app.sessions.start(dialogue.chat_id(), &app.catalog);
    show_quiz_screen(bot, dialogue.chat_id(), &navigator, app).await?;

    dialogue.update(State::Quiz { navigator }).await?;
    Ok(())
}

async fn show_quiz_screen(
    bot: &Bot,
    chat_id: ChatId,
    navigator: &Navigator,
    app: &App,
) -> HandlerResult {
    let (text, keyboard) = screens::quiz_screen(navigator, &app.catalog)
        .ok_or("Navigator points past the end of the catalog")?;

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

async fn quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    navigator: Navigator,
    app: Arc<App>,
    msg: Message,
) -> HandlerResult {
    let mut navigator = navigator;

    let transition = match msg.text() {
        Some(RESTART_BUTTON) => return begin_quiz(&bot, &dialogue, &app).await,
        Some(PREVIOUS_BUTTON) => navigator.retreat(),
        Some(ENTER_BUTTON) | Some(NEXT_BUTTON) => {
            if !navigator.is_intro() && !navigator.is_current_answered() {
                bot.send_message(msg.chat.id, "請先選擇一個答案").await?;
                return Ok(());
            }
            navigator.advance()
        }
        Some(label) => {
            let Some(option) = app.catalog.option_by_label(label) else {
                bot.send_message(msg.chat.id, "請使用下方按鈕作答").await?;
                return Ok(());
            };
            if let Err(err) = navigator.record_answer(option.value) {
                debug!("Answer rejected in chat {}: {}", msg.chat.id.0, err);
                bot.send_message(msg.chat.id, format!("請先按「{}」", ENTER_BUTTON))
                    .await?;
                return Ok(());
            }
            navigator.advance()
        }
        None => {
            bot.send_message(msg.chat.id, "請使用下方按鈕作答").await?;
            return Ok(());
        }
    };

    match transition {
        Transition::Moved => {
            show_quiz_screen(&bot, msg.chat.id, &navigator, &app).await?;
            dialogue.update(State::Quiz { navigator }).await?;
            Ok(())
        }
        Transition::ExitToStart => show_hero(&bot, &dialogue, msg.chat.id).await,
        Transition::Completed => enter_diagnosing(bot, dialogue, navigator, app).await,
    }
}

/// Entering the diagnosing step starts exactly one report request, in the
/// background, so the chat stays responsive while it runs.
async fn enter_diagnosing(
    bot: Bot,
    dialogue: QuizDialogue,
    navigator: Navigator,
    app: Arc<App>,
) -> HandlerResult {
    let chat_id = dialogue.chat_id();
    let summary = summarize(navigator.answers(), &app.catalog);
    let request = ReportRequest::new(&summary, navigator.answers(), &app.catalog);
    // Read before the first await: the chat's next update may already be a restart.
    let coordinator = app.sessions.coordinator(chat_id);
    let generation = coordinator.generation();
    info!(
        "Quiz completed in chat {} with total score {} (generation {})",
        chat_id.0, summary.total, generation
    );

    dialogue
        .update(State::Diagnosing {
            navigator: navigator.clone(),
        })
        .await?;

    bot.send_message(chat_id, "作答完成！報告生成中，大約需要半分鐘。")
        .reply_markup(screens::restart_keyboard())
        .await?;
    let progress = bot
        .send_message(chat_id, progress::progress_text(0))
        .await?;

    tokio::spawn(diagnose(
        bot,
        dialogue,
        navigator,
        coordinator,
        generation,
        summary,
        request,
        app,
        progress.id,
    ));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn diagnose(
    bot: Bot,
    dialogue: QuizDialogue,
    navigator: Navigator,
    coordinator: Arc<ReportCoordinator>,
    generation: u64,
    summary: ScoreSummary,
    request: ReportRequest,
    app: Arc<App>,
    progress_id: MessageId,
) {
    let chat_id = dialogue.chat_id();
    let ticker = tokio::spawn(progress::run_ticker(
        bot.clone(),
        chat_id,
        progress_id,
        coordinator.subscribe(),
        generation,
        app.progress_tick,
    ));
    // Only a hint for the user, failure doesn't matter.
    let _ = bot.send_chat_action(chat_id, ChatAction::Typing).await;

    let settled = match coordinator.request_report(generation, &summary, request).await {
        RequestOutcome::Settled(settled) => settled,
        RequestOutcome::AlreadyRequested => match coordinator.settled(generation) {
            Some(settled) => settled,
            None => {
                debug!("Report for chat {} is still being fetched elsewhere", chat_id.0);
                ticker.abort();
                return;
            }
        },
        RequestOutcome::Stale => {
            debug!("Run in chat {} was restarted, dropping its report", chat_id.0);
            ticker.abort();
            return;
        }
        RequestOutcome::IncompleteSummary => {
            warn!("Chat {} finished the quiz with an incomplete summary", chat_id.0);
            ticker.abort();
            return;
        }
    };
    let _ = ticker.await;

    if !still_diagnosing(&dialogue, &coordinator, generation).await {
        debug!("Chat {} left the run before its result was shown", chat_id.0);
        return;
    }
    if let Err(err) = show_result(&bot, chat_id, &navigator, &settled, &app).await {
        error!("Failed to send result to chat {}: {}", chat_id.0, err);
        return;
    }
    if !still_diagnosing(&dialogue, &coordinator, generation).await {
        return;
    }
    if let Err(err) = dialogue.update(State::Result { navigator }).await {
        error!("Failed to store result state for chat {}: {}", chat_id.0, err);
    }
}

/// True while the chat is still waiting on run `generation`.
async fn still_diagnosing(
    dialogue: &QuizDialogue,
    coordinator: &ReportCoordinator,
    generation: u64,
) -> bool {
    if coordinator.generation() != generation {
        return false;
    }
    matches!(dialogue.get().await, Ok(Some(State::Diagnosing { .. })))
}

async fn show_result(
    bot: &Bot,
    chat_id: ChatId,
    navigator: &Navigator,
    settled: &SettledReport,
    app: &App,
) -> HandlerResult {
    let summary = summarize(navigator.answers(), &app.catalog);
    let persona = app.personas.resolve(&settled.report.selected_persona_id);

    for text in screens::result_messages(&summary, settled, persona, app.chart_max()) {
        bot.send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(screens::restart_keyboard())
            .await?;
    }
    Ok(())
}

async fn diagnosing(
    bot: Bot,
    dialogue: QuizDialogue,
    app: Arc<App>,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(RESTART_BUTTON) => begin_quiz(&bot, &dialogue, &app).await,
        _ => {
            bot.send_message(msg.chat.id, "報告還在生成中，請稍候…")
                .await?;
            Ok(())
        }
    }
}

async fn result(
    bot: Bot,
    dialogue: QuizDialogue,
    navigator: Navigator,
    app: Arc<App>,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(RESTART_BUTTON) => begin_quiz(&bot, &dialogue, &app).await,
        _ => match app.sessions.coordinator(msg.chat.id).phase() {
            Phase::Settled(settled) => {
                show_result(&bot, msg.chat.id, &navigator, &settled, &app).await
            }
            _ => {
                bot.send_message(msg.chat.id, format!("這份報告已失效，請按「{}」", RESTART_BUTTON))
                    .reply_markup(screens::restart_keyboard())
                    .await?;
                Ok(())
            }
        },
    }
}

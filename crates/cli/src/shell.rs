//! Interactive shell: executes parsed commands against one [`SpinSession`].
//!
//! Spins and detail lookups run on spawned tasks so the prompt stays usable
//! while the wheel settles or the lookup services answer. Their results reach
//! the terminal through the event bus and the detail task respectively.

use std::fmt::Write as _;
use std::sync::Arc;

use aniwheel_core::catalog::{CatalogEntry, Enrichment};
use aniwheel_core::events::WheelEvent;
use aniwheel_core::filter::FilterValue;
use aniwheel_core::pager::PAGE_SIZE;
use aniwheel_core::registry::ToggleOutcome;
use aniwheel_core::session::SpinSession;
use aniwheel_core::state::AppState;
use aniwheel_lookup::detail::{DetailInfo, DetailResolver};

use crate::command::{Command, HELP};

/// What the main loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Print(String),
    Quiet,
    Quit,
}

pub struct Shell {
    session: Arc<SpinSession>,
    resolver: DetailResolver,
}

impl Shell {
    pub fn new(session: Arc<SpinSession>, resolver: DetailResolver) -> Self {
        Self { session, resolver }
    }

    pub async fn execute(&self, command: Command) -> Reply {
        match command {
            Command::Help => Reply::Print(HELP.to_string()),
            Command::Quit => Reply::Quit,

            Command::List => Reply::Print(self.render_page().await),
            Command::NextPage => {
                let moved = self.session.lock().await.next_page();
                self.page_reply(moved, "Already on the last page").await
            }
            Command::PrevPage => {
                let moved = self.session.lock().await.prev_page();
                self.page_reply(moved, "Already on the first page").await
            }
            Command::GoToPage(page) => {
                self.session.lock().await.go_to_page(page);
                Reply::Print(self.render_page().await)
            }

            Command::Search(text) => {
                {
                    let mut state = self.session.lock().await;
                    state.set_search_text(text);
                    state.search();
                }
                Reply::Print(self.render_page().await)
            }
            Command::ToggleFilter(value) => {
                let active = self.session.lock().await.toggle_filter(value.clone());
                let label = match &value {
                    FilterValue::Status(s) => s.to_string(),
                    FilterValue::Genre(g) => g.clone(),
                    FilterValue::CharacterTrait(t) => t.clone(),
                };
                let verb = if active { "on" } else { "off" };
                Reply::Print(format!("Filter {label} {verb}\n{}", self.render_page().await))
            }
            Command::ApplyFilters => {
                self.session.lock().await.apply_filters();
                Reply::Print(self.render_page().await)
            }
            Command::ResetFilters => {
                self.session.lock().await.reset_filters();
                Reply::Print(self.render_page().await)
            }
            Command::Facets => Reply::Print(render_facets(&*self.session.lock().await)),

            Command::Toggle(name) => match self.session.toggle_in_wheel(&name).await {
                Ok(_) => Reply::Quiet,
                Err(e) => Reply::Print(e.to_string()),
            },
            Command::Remove(name) => {
                if self.session.lock().await.remove_from_wheel(&name) {
                    Reply::Print(format!("Removed {name} from the wheel"))
                } else {
                    Reply::Print(format!("{name} is not on the wheel"))
                }
            }
            Command::Random(count) => {
                self.session.random_batch_add(count).await;
                Reply::Quiet
            }

            Command::Slots(count) => {
                let count = self.session.lock().await.custom_mut().set_slot_count(count);
                Reply::Print(format!("{count} custom slots"))
            }
            Command::Custom { slot, text } => {
                let mut state = self.session.lock().await;
                let count = state.custom().slot_count();
                let updated = slot
                    .checked_sub(1)
                    .is_some_and(|index| state.custom_mut().set(index, text));
                if updated {
                    Reply::Print(format!("Custom slot {slot} updated"))
                } else {
                    Reply::Print(format!("Slot {slot} does not exist (1-{count})"))
                }
            }

            Command::Wheel => Reply::Print(render_wheel(&*self.session.lock().await)),
            Command::Spin => self.spin().await,
            Command::Results => Reply::Print(render_results(&*self.session.lock().await)),
            Command::Clear => {
                self.session.clear_all().await;
                Reply::Quiet
            }

            Command::Detail(name) => self.open_detail(&name).await,
            Command::CloseDetail => {
                self.session.lock().await.close_detail();
                Reply::Quiet
            }
        }
    }

    async fn page_reply(&self, moved: bool, unchanged: &str) -> Reply {
        if moved {
            Reply::Print(self.render_page().await)
        } else {
            Reply::Print(unchanged.to_string())
        }
    }

    async fn render_page(&self) -> String {
        render_page(&*self.session.lock().await)
    }

    /// Start a spin in the background. Its outcome or rejection arrives as
    /// a bus notification.
    async fn spin(&self) -> Reply {
        let starting = {
            let state = self.session.lock().await;
            !state.is_spinning() && !state.wheel_contents().is_empty()
        };

        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            // Rejections and completions are published on the bus.
            let _ = session.spin().await;
        });

        if starting {
            Reply::Print("The wheel is spinning...".into())
        } else {
            Reply::Quiet
        }
    }

    /// Show the catalog fields now, then fill in lookups in the background.
    async fn open_detail(&self, name: &str) -> Reply {
        let (ticket, entry) = {
            let mut state = self.session.lock().await;
            let ticket = match state.open_detail(name) {
                Ok(ticket) => ticket,
                Err(e) => return Reply::Print(e.to_string()),
            };
            match state.detail().cloned() {
                Some(entry) => (ticket, entry),
                None => return Reply::Quiet,
            }
        };

        let summary = render_entry(&entry);
        let session = Arc::clone(&self.session);
        let resolver = self.resolver.clone();
        tokio::spawn(async move {
            let detail = resolver.resolve(&entry).await;
            let mut state = session.lock().await;
            if state.apply_detail(&ticket, &detail.enrichment) {
                if let Some(updated) = state.detail() {
                    println!("{}", render_lookup(updated, &detail));
                }
            }
        });

        Reply::Print(summary)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_page(state: &AppState) -> String {
    let browser = state.browser();
    let mut out = format!(
        "Page {}/{} ({} shown, {} on the wheel)\n",
        browser.page(),
        browser.total_pages(),
        browser.visible_count(),
        state.registry().len(),
    );
    let offset = (browser.page() - 1) * PAGE_SIZE;
    for (i, entry) in state.current_page().into_iter().enumerate() {
        let mark = if state.registry().contains(&entry.name) {
            "*"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "[{mark}] {:>3}. {} ({}) {}",
            offset + i + 1,
            entry.name,
            entry.status,
            entry.genres.join("/"),
        );
    }
    out.trim_end().to_string()
}

/// Distinct filter values; active ones are marked with `*`.
fn render_facets(state: &AppState) -> String {
    let facets = state.catalog().facets();
    let selection = state.browser().selection();
    let line = |values: Vec<(String, FilterValue)>| {
        values
            .into_iter()
            .map(|(label, value)| {
                if selection.is_active(&value) {
                    format!("{label}*")
                } else {
                    label
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    let statuses: Vec<_> = facets
        .statuses
        .iter()
        .map(|s| (s.to_string(), FilterValue::Status(*s)))
        .collect();
    let genres: Vec<_> = facets
        .genres
        .into_iter()
        .map(|g| (g.clone(), FilterValue::Genre(g)))
        .collect();
    let traits: Vec<_> = facets
        .character_traits
        .into_iter()
        .map(|t| (t.clone(), FilterValue::CharacterTrait(t)))
        .collect();

    let mut out = format!(
        "status: {}\ngenre:  {}\ntrait:  {}",
        line(statuses),
        line(genres),
        line(traits),
    );
    if selection.has_no_categories() {
        out.push_str("\n(no filters active)");
    }
    out
}

fn render_wheel(state: &AppState) -> String {
    let contents = state.wheel_contents();
    if contents.is_empty() {
        return "The wheel is empty".into();
    }
    let mut out = format!("{} segments, rotation {:.0}\u{b0}\n", contents.len(), state.rotation());
    for (i, label) in contents.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {label}", i + 1);
    }
    out.trim_end().to_string()
}

fn render_results(state: &AppState) -> String {
    let outcomes = state.results().outcomes();
    if outcomes.is_empty() {
        return "No spins yet".into();
    }
    let mut out = String::new();
    for (i, outcome) in outcomes.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} ({})",
            i + 1,
            outcome.label,
            outcome.spun_at.format("%H:%M:%S"),
        );
    }
    out.trim_end().to_string()
}

fn render_entry(entry: &CatalogEntry) -> String {
    let mut out = format!("{} [{}]\n", entry.name, entry.status);
    if !entry.genres.is_empty() {
        let _ = writeln!(out, "genre:  {}", entry.genres.join(", "));
    }
    if !entry.character_traits.is_empty() {
        let _ = writeln!(out, "trait:  {}", entry.character_traits.join(", "));
    }
    if let Some(desc) = &entry.desc {
        let _ = writeln!(out, "{desc}");
    }
    out.push_str(&render_enrichment(&Enrichment {
        year: entry.year,
        episode_count: entry.episode_count,
        score: entry.score,
        total_seasons: entry.total_seasons,
    }));
    out.trim_end().to_string()
}

fn render_lookup(entry: &CatalogEntry, detail: &DetailInfo) -> String {
    let mut out = format!("{}:\n", entry.name);
    out.push_str(&render_enrichment(&Enrichment {
        year: entry.year,
        episode_count: entry.episode_count,
        score: entry.score,
        total_seasons: entry.total_seasons,
    }));
    match &detail.trailer {
        Some(trailer) => {
            let _ = writeln!(out, "trailer: {}", trailer.watch_url());
            let _ = writeln!(out, "embed:   {}", trailer.embed_url());
        }
        None => out.push_str("trailer: none found\n"),
    }
    out.trim_end().to_string()
}

fn render_enrichment(enrichment: &Enrichment) -> String {
    let mut out = String::new();
    if let Some(year) = enrichment.year {
        let _ = writeln!(out, "year:     {year}");
    }
    if let Some(episodes) = enrichment.episode_count {
        let _ = writeln!(out, "episodes: {episodes}");
    }
    if let Some(score) = enrichment.score {
        let _ = writeln!(out, "score:    {score:.2}");
    }
    if let Some(seasons) = enrichment.total_seasons.filter(|&s| s > 1) {
        let _ = writeln!(out, "seasons:  {seasons}");
    }
    out
}

/// One-line text for a bus notification.
pub fn describe_event(event: &WheelEvent) -> String {
    match event {
        WheelEvent::RegistryToggled {
            name,
            outcome: ToggleOutcome::Added,
        } => format!("Added {name} to the wheel"),
        WheelEvent::RegistryToggled {
            name,
            outcome: ToggleOutcome::Removed,
        } => format!("Removed {name} from the wheel"),
        WheelEvent::RandomBatchAdded { names } if names.is_empty() => {
            "Every show is already on the wheel".into()
        }
        WheelEvent::RandomBatchAdded { names } => {
            format!("Added {} random shows: {}", names.len(), names.join(", "))
        }
        WheelEvent::SpinCompleted { outcome } => format!("The wheel picked: {}", outcome.label),
        WheelEvent::SpinRejected { reason } => reason.clone(),
        WheelEvent::WheelCleared => "Wheel, results and custom entries cleared".into(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use aniwheel_core::catalog::{Catalog, ShowStatus};
    use aniwheel_core::session::SessionConfig;
    use aniwheel_lookup::trailer::{TrailerOrigin, TrailerRef};
    use assert_matches::assert_matches;

    const SETTLE: Duration = Duration::from_millis(500);

    fn shell() -> Shell {
        let entries = (1..=14)
            .map(|i| {
                let status = if i % 2 == 0 {
                    ShowStatus::Ongoing
                } else {
                    ShowStatus::Completed
                };
                CatalogEntry::new(format!("Show {i:02}"), status).with_genres(["冒險"])
            })
            .collect();
        let catalog = Catalog::new(entries).unwrap();
        let session = SpinSession::from_config(
            catalog,
            &SessionConfig {
                settle_delay: SETTLE,
                seed: Some(9),
            },
        );
        Shell::new(Arc::new(session), DetailResolver::default())
    }

    fn printed(reply: Reply) -> String {
        match reply {
            Reply::Print(text) => text,
            other => panic!("expected printed output, got {other:?}"),
        }
    }

    // -- browsing ------------------------------------------------------------

    #[tokio::test]
    async fn list_shows_first_page() {
        let out = printed(shell().execute(Command::List).await);
        assert!(out.starts_with("Page 1/2 (14 shown, 0 on the wheel)"));
        assert!(out.contains("Show 12"));
        assert!(!out.contains("Show 13"));
    }

    #[tokio::test]
    async fn paging_past_the_end_reports_it() {
        let shell = shell();
        let out = printed(shell.execute(Command::NextPage).await);
        assert!(out.contains("Show 13"));
        assert_eq!(
            shell.execute(Command::NextPage).await,
            Reply::Print("Already on the last page".into())
        );
    }

    #[tokio::test]
    async fn search_narrows_the_view() {
        let out = printed(shell().execute(Command::Search("show 1".into())).await);
        assert!(out.starts_with("Page 1/1 (5 shown"));
    }

    // -- wheel ---------------------------------------------------------------

    #[tokio::test]
    async fn unknown_entry_is_reported() {
        let out = printed(shell().execute(Command::Toggle("Missing".into())).await);
        assert!(out.contains("Missing"));
    }

    #[tokio::test]
    async fn custom_slot_bounds_are_checked() {
        let shell = shell();
        assert_eq!(
            shell
                .execute(Command::Custom {
                    slot: 6,
                    text: "x".into()
                })
                .await,
            Reply::Print("Slot 6 does not exist (1-5)".into())
        );
        assert_eq!(
            shell.execute(Command::Slots(20)).await,
            Reply::Print("10 custom slots".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn spin_runs_in_background_and_logs_result() {
        let shell = shell();
        let mut rx = shell.session.subscribe();
        shell.execute(Command::Toggle("Show 03".into())).await;
        shell
            .execute(Command::Custom {
                slot: 1,
                text: "睡覺".into(),
            })
            .await;

        assert_eq!(
            shell.execute(Command::Spin).await,
            Reply::Print("The wheel is spinning...".into())
        );
        tokio::time::sleep(SETTLE + Duration::from_millis(10)).await;

        assert_matches!(rx.recv().await, Ok(WheelEvent::RegistryToggled { .. }));
        assert_matches!(rx.recv().await, Ok(WheelEvent::SpinCompleted { .. }));
        let out = printed(shell.execute(Command::Results).await);
        assert!(out.starts_with("  1. "));
    }

    #[tokio::test]
    async fn spinning_an_empty_wheel_stays_quiet_at_the_prompt() {
        let shell = shell();
        let mut rx = shell.session.subscribe();
        assert_eq!(shell.execute(Command::Spin).await, Reply::Quiet);
        let event = rx.recv().await.unwrap();
        assert_eq!(describe_event(&event), "The wheel is empty; add shows or custom entries first");
    }

    #[tokio::test]
    async fn wheel_lists_registry_then_custom_entries() {
        let shell = shell();
        shell.execute(Command::Toggle("Show 05".into())).await;
        shell
            .execute(Command::Custom {
                slot: 2,
                text: "打電動".into(),
            })
            .await;
        let out = printed(shell.execute(Command::Wheel).await);
        assert_eq!(out, "2 segments, rotation 0\u{b0}\n  1. Show 05\n  2. 打電動");
    }

    // -- notifications -------------------------------------------------------

    #[test]
    fn events_have_readable_descriptions() {
        assert_eq!(
            describe_event(&WheelEvent::RandomBatchAdded { names: vec![] }),
            "Every show is already on the wheel"
        );
        assert_eq!(
            describe_event(&WheelEvent::RandomBatchAdded {
                names: vec!["A".into(), "B".into()]
            }),
            "Added 2 random shows: A, B"
        );
        assert_eq!(
            describe_event(&WheelEvent::RegistryToggled {
                name: "A".into(),
                outcome: ToggleOutcome::Removed
            }),
            "Removed A from the wheel"
        );
    }

    #[tokio::test]
    async fn facets_mark_active_filters() {
        let shell = shell();
        let out = printed(shell.execute(Command::Facets).await);
        assert_eq!(
            out,
            "status: Completed, Ongoing\ngenre:  冒險\ntrait:  \n(no filters active)"
        );

        shell
            .execute(Command::ToggleFilter(FilterValue::Status(ShowStatus::Ongoing)))
            .await;
        let out = printed(shell.execute(Command::Facets).await);
        assert_eq!(out, "status: Completed, Ongoing*\ngenre:  冒險\ntrait:  ");
    }

    // -- detail --------------------------------------------------------------

    #[test]
    fn lookup_shows_watch_and_embed_links() {
        let mut entry = CatalogEntry::new("Show 01", ShowStatus::Completed);
        entry.year = Some(2019);
        let detail = DetailInfo {
            enrichment: Enrichment::default(),
            trailer: Some(TrailerRef {
                video_id: "abc".into(),
                origin: TrailerOrigin::Search,
            }),
        };
        assert_eq!(
            render_lookup(&entry, &detail),
            "Show 01:\nyear:     2019\n\
             trailer: https://www.youtube.com/watch?v=abc\n\
             embed:   https://www.youtube.com/embed/abc"
        );
    }

    #[tokio::test]
    async fn detail_prints_catalog_fields_immediately() {
        let shell = shell();
        let out = printed(shell.execute(Command::Detail("Show 02".into())).await);
        assert_eq!(out, "Show 02 [Ongoing]\ngenre:  冒險");

        let out = printed(shell.execute(Command::Detail("Nope".into())).await);
        assert!(out.contains("Nope"));
    }
}

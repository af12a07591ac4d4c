//! Numbered page links: first, last, and a window around the current page

use iced::widget::{button, text, Row};
use iced::Element;

use crate::state::address::{Route, SearchParams};
use crate::Message;

/// Pages shown on each side of the current one
const SIBLINGS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Layout of the pagination control for `count` pages.
///
/// Always shows the first and last page and `SIBLINGS` pages around
/// `current`. A gap of a single page shows that page instead of "…".
pub fn page_items(current: u32, count: u32) -> Vec<PageItem> {
    if count == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, count);

    let mut pages: Vec<u32> = vec![1, count];
    pages.extend(current.saturating_sub(SIBLINGS).max(1)..=(current + SIBLINGS).min(count));
    pages.sort_unstable();
    pages.dedup();

    let mut items = Vec::with_capacity(pages.len() + 2);
    let mut previous: Option<u32> = None;
    for page in pages {
        if let Some(prev) = previous {
            match page - prev {
                1 => {}
                2 => items.push(PageItem::Page(prev + 1)),
                _ => items.push(PageItem::Ellipsis),
            }
        }
        items.push(PageItem::Page(page));
        previous = Some(page);
    }
    items
}

/// Previous / numbered pages / next. Each link jumps (no `more` flag).
pub fn view<'a>(current: &SearchParams, count: u32) -> Element<'a, Message> {
    let jump = |page: u32| Message::Navigate(Route::Search(current.jump_to(page)));
    let page = current.page;

    let mut controls = Row::new().spacing(6).push(
        button(text("‹"))
            .on_press_maybe((page > 1).then(|| jump(page - 1)))
            .style(button::secondary),
    );

    for item in page_items(page, count) {
        controls = match item {
            PageItem::Ellipsis => controls.push(text("…")),
            PageItem::Page(n) if n == page => {
                controls.push(button(text(n.to_string())).style(button::primary))
            }
            PageItem::Page(n) => controls.push(
                button(text(n.to_string()))
                    .on_press(jump(n))
                    .style(button::secondary),
            ),
        };
    }

    controls
        .push(
            button(text("›"))
                .on_press_maybe((page < count).then(|| jump(page + 1)))
                .style(button::secondary),
        )
        .into()
}

use iced::widget::{column, row, text, Column};
use iced::{Element, Length};

use super::{poster, toggle};
use crate::state::data::MovieDetail;
use crate::state::detail::DetailStatus;
use crate::state::favourites::FavouritesStore;
use crate::state::posters::PosterCache;
use crate::Message;

const DETAIL_POSTER_WIDTH: f32 = 300.0;

pub fn view<'a>(
    status: &'a DetailStatus,
    favourites: &FavouritesStore,
    posters: &PosterCache,
) -> Element<'a, Message> {
    match status {
        DetailStatus::Idle => text("").into(),
        DetailStatus::Loading => text("Loading...").into(),
        DetailStatus::Failed(message) => text(message.as_str()).into(),
        DetailStatus::Loaded(detail) => loaded(detail, favourites, posters),
    }
}

fn loaded<'a>(
    detail: &'a MovieDetail,
    favourites: &FavouritesStore,
    posters: &PosterCache,
) -> Element<'a, Message> {
    let mut info = Column::new()
        .spacing(12)
        .push(text(detail.title.as_str()).size(32));

    let headline: Vec<&str> = ["Year", "Rated", "Runtime", "Genre"]
        .into_iter()
        .filter_map(|name| detail.attribute(name))
        .collect();
    if !headline.is_empty() {
        info = info.push(text(headline.join(" · ")).size(16));
    }

    info = info.push(toggle::view(&detail.imdb_id, favourites));

    if !detail.ratings.is_empty() {
        let ratings = detail.ratings.iter().fold(Column::new().spacing(4), |col, rating| {
            col.push(text(format!("{}: {}", rating.source, rating.value)).size(14))
        });
        info = info.push(column![text("Ratings").size(20), ratings].spacing(6));
    }

    let attributes = detail
        .display_attributes()
        .fold(Column::new().spacing(4), |col, (name, value)| {
            col.push(
                row![
                    text(name).width(Length::Fixed(140.0)),
                    text(value).width(Length::Fill),
                ]
                .spacing(8),
            )
        });
    info = info.push(attributes);

    row![
        poster(posters, detail.poster_url(), DETAIL_POSTER_WIDTH),
        info.width(Length::Fill),
    ]
    .spacing(32)
    .into()
}

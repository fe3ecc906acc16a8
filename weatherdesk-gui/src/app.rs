//! The window itself: search row, result region, nav bar and footer.
//!
//! All display state lives here and is only ever mutated from `update`, on
//! the UI thread. Lookups run through `Task::perform`, which hands the result
//! back as a message.

use iced::widget::{button, column, container, image, row, stack, text, text_input};
use iced::{Alignment, Color, ContentFit, Element, Length, Task};

use weatherdesk_core::{ForecastResolver, ResolveError, WeatherSnapshot};

use crate::icons::{self, WeatherIcon, icon_for_condition};

const NAV_BG: Color = Color::from_rgb(121.0 / 255.0, 166.0 / 255.0, 210.0 / 255.0);
const FOOTER_BG: Color = Color::from_rgb(255.0 / 255.0, 105.0 / 255.0, 180.0 / 255.0);
const TEMPERATURE_COLOR: Color = Color::from_rgb(255.0 / 255.0, 69.0 / 255.0, 0.0 / 255.0);
const TEXT_GRAY: Color = Color::from_rgb(105.0 / 255.0, 105.0 / 255.0, 105.0 / 255.0);
const NOTICE_COLOR: Color = Color::from_rgb(200.0 / 255.0, 30.0 / 255.0, 30.0 / 255.0);

const EMPTY_INPUT_NOTICE: &str = "Please enter a location.";

#[derive(Debug, Clone)]
pub enum Message {
    InputChanged(String),
    SearchSubmitted,
    Fetched(u64, Result<WeatherSnapshot, ResolveError>),
}

/// What the result region currently shows.
///
/// `Placeholder` carries the static sample content the window opens with;
/// `Ready` and `Failed` are both terminal until the next search.
#[derive(Debug, Clone, PartialEq)]
enum DisplayState {
    Placeholder,
    Ready(WeatherSnapshot),
    Failed,
}

pub struct WeatherDesk {
    resolver: ForecastResolver,
    input: String,
    notice: Option<String>,
    display: DisplayState,
    searching: bool,
    /// Id of the most recently dispatched lookup. Completions carrying any
    /// other id are stale and get discarded, so a slow early search can
    /// never overwrite the result of a later one.
    latest_request: u64,
}

impl WeatherDesk {
    pub fn new(resolver: ForecastResolver) -> Self {
        Self {
            resolver,
            input: String::new(),
            notice: None,
            display: DisplayState::Placeholder,
            searching: false,
            latest_request: 0,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::InputChanged(value) => {
                self.input = value;
                Task::none()
            }
            Message::SearchSubmitted => {
                let query = self.input.trim().to_string();
                if query.is_empty() {
                    self.notice = Some(EMPTY_INPUT_NOTICE.to_string());
                    return Task::none();
                }

                self.notice = None;
                self.searching = true;
                self.latest_request += 1;
                let id = self.latest_request;

                tracing::info!(id, %query, "starting lookup");

                let resolver = self.resolver.clone();
                Task::perform(
                    async move { resolver.resolve(&query).await },
                    move |result| Message::Fetched(id, result),
                )
            }
            Message::Fetched(id, result) => {
                if id != self.latest_request {
                    tracing::debug!(id, latest = self.latest_request, "discarding stale lookup");
                    return Task::none();
                }

                self.searching = false;
                match result {
                    Ok(snapshot) => {
                        tracing::info!(id, condition = %snapshot.condition, "lookup succeeded");
                        self.display = DisplayState::Ready(snapshot);
                    }
                    Err(err) => {
                        tracing::warn!(id, %err, "lookup failed");
                        self.display = DisplayState::Failed;
                    }
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        column![self.nav_bar(), self.main_content(), self.footer()].into()
    }

    fn nav_bar(&self) -> Element<'_, Message> {
        container(text("Weather App").size(24))
            .center_x(Length::Fill)
            .padding(12)
            .style(|_| container::Style {
                background: Some(NAV_BG.into()),
                ..container::Style::default()
            })
            .into()
    }

    fn footer(&self) -> Element<'_, Message> {
        container(text("WeatherDesk").size(14).color(Color::WHITE))
            .center_x(Length::Fill)
            .padding(10)
            .style(|_| container::Style {
                background: Some(FOOTER_BG.into()),
                ..container::Style::default()
            })
            .into()
    }

    fn search_row(&self) -> Element<'_, Message> {
        row![
            text_input("Enter a location", &self.input)
                .on_input(Message::InputChanged)
                .on_submit(Message::SearchSubmitted)
                .size(20)
                .padding(10),
            button(image(icons::search_icon()).width(40).height(40))
                .on_press(Message::SearchSubmitted)
                .padding(5),
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
    }

    fn main_content(&self) -> Element<'_, Message> {
        let (icon, temperature, condition, humidity, windspeed) = match &self.display {
            DisplayState::Placeholder => (
                WeatherIcon::Cloudy,
                "10 C".to_string(),
                "Cloudy".to_string(),
                "100%".to_string(),
                "15km/h".to_string(),
            ),
            DisplayState::Ready(snapshot) => (
                icon_for_condition(&snapshot.condition),
                format!("{} C", snapshot.temperature_c),
                snapshot.condition.clone(),
                format!("{}%", snapshot.humidity_pct),
                format!("{}km/h", snapshot.wind_speed_kmh),
            ),
            DisplayState::Failed => (
                WeatherIcon::Error,
                "Error".to_string(),
                "Not found".to_string(),
                "N/A".to_string(),
                "N/A".to_string(),
            ),
        };

        let mut content = column![self.search_row()]
            .spacing(15)
            .padding(20)
            .align_x(Alignment::Center)
            .width(Length::Fill);

        if let Some(notice) = &self.notice {
            content = content.push(text(notice.as_str()).size(16).color(NOTICE_COLOR));
        }
        if self.searching {
            content = content.push(text("Searching...").size(16).color(TEXT_GRAY));
        }

        content = content
            .push(image(icon.handle()).width(450).height(250))
            .push(text(temperature).size(48).color(TEMPERATURE_COLOR))
            .push(text(condition).size(28).color(TEXT_GRAY))
            .push(
                row![
                    row![
                        image(icons::humidity_icon()).width(50).height(50),
                        text(format!("Humidity: {humidity}"))
                            .size(18)
                            .color(TEXT_GRAY),
                    ]
                    .spacing(10)
                    .align_y(Alignment::Center),
                    row![
                        image(icons::windspeed_icon()).width(50).height(50),
                        text(format!("Windspeed: {windspeed}"))
                            .size(18)
                            .color(TEXT_GRAY),
                    ]
                    .spacing(10)
                    .align_y(Alignment::Center),
                ]
                .spacing(40)
                .align_y(Alignment::Center),
            );

        stack![
            image(icons::background())
                .width(Length::Fill)
                .height(Length::Fill)
                .content_fit(ContentFit::Cover),
            content,
        ]
        .height(Length::Fill)
        .into()
    }
}

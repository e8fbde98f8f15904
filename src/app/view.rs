use super::messages::Message;
use super::state::{App, DragTarget, ART_NAMES, HEADER_HEIGHT, ITEM_NAMES};
use crate::gate::GateState;
use crate::timeline::control::{ControlPhase, Feedback};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{Column, button, column, container, horizontal_space, row, text};
use iced::{Element, Length};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let spread_label = match self.book.current_page() {
            -1 => "Cover".to_string(),
            current => format!(
                "Spread {}-{} of {}",
                current + 1,
                current + 2,
                self.book.page_count()
            ),
        };
        let gate_label = match self.gate.state() {
            GateState::Loading => "Loading…",
            GateState::Active => "Drag a page edge to turn",
            GateState::Disabled => "Turning…",
        };

        let header = row![
            text(&self.story.title).size(22.0),
            horizontal_space(),
            text(spread_label),
            horizontal_space(),
            text(gate_label),
        ]
        .spacing(10)
        .padding(12)
        .height(HEADER_HEIGHT)
        .align_y(Vertical::Center)
        .width(Length::Fill);

        let spread = row![
            self.page_panel(self.book.current_page()),
            self.page_panel(self.book.current_page() + 1),
        ]
        .spacing(4)
        .height(Length::FillPortion(3))
        .width(Length::Fill);

        let mut content: Column<'_, Message> = column![header, spread].spacing(8);

        if let Some(position) = self.book.position() {
            content = content.push(
                text(format!("Turning the page  {position:+.2}"))
                    .width(Length::Fill)
                    .align_x(Horizontal::Center),
            );
        }

        if self.building_spread_open() {
            content = content.push(self.building_panel());
        }
        if self.control_spread_open() {
            content = content.push(self.control_panel());
        }

        container(content.padding(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn page_panel(&self, index: i32) -> Element<'_, Message> {
        let caption = usize::try_from(index)
            .ok()
            .and_then(|index| self.story.pages.get(index))
            .map(|page| page.caption.as_str())
            .unwrap_or("");

        container(
            text(caption)
                .width(Length::Fill)
                .align_x(Horizontal::Center),
        )
        .width(Length::FillPortion(1))
        .height(Length::Fill)
        .padding(20)
        .into()
    }

    fn building_panel(&self) -> Element<'_, Message> {
        let art = ART_NAMES.get(self.building.art()).copied().unwrap_or("");
        let prompt = match self.building.expected_item() {
            Some(item) if self.building.gate().accepts() => {
                format!("Drag the {} onto the platform", ITEM_NAMES[item])
            }
            _ => String::new(),
        };
        let carried = match self.drag_target {
            Some(DragTarget::Item { item, .. }) => format!("Carrying the {}", ITEM_NAMES[item]),
            _ => String::new(),
        };

        let items = ITEM_NAMES.iter().fold(
            iced::widget::Row::new().spacing(8).width(Length::Fill),
            |items, name| {
                items.push(
                    container(text(*name).align_x(Horizontal::Center))
                        .width(Length::FillPortion(1))
                        .padding(10),
                )
            },
        );

        column![
            text(art),
            text(prompt),
            text(carried),
            items,
        ]
        .spacing(6)
        .width(Length::Fill)
        .into()
    }

    fn control_panel(&self) -> Element<'_, Message> {
        let phase_label = match self.control.phase() {
            ControlPhase::Closed => "Mission control is dark",
            ControlPhase::OnStart => "The rocket waits on the pad",
            ControlPhase::Launch => "Liftoff!",
            ControlPhase::AroundEarth => "Circling the Earth",
            ControlPhase::WayToMoon => "Coasting to the moon",
            ControlPhase::AroundMoon => "Circling the moon",
            ControlPhase::Landing => "Touchdown in the moon dust",
        };
        let feedback_label = match self.control.feedback() {
            Feedback::Empty => "",
            Feedback::Success => "Great timing!",
            Feedback::Early => "Not yet, keep watching",
            Feedback::Late => "Too late, circling back",
        };
        let hint = if self.control.is_rewound() {
            "Watch the approach again"
        } else if self.control.is_ready() {
            "Press the big button!"
        } else {
            ""
        };

        row![
            button(text("LAUNCH").align_x(Horizontal::Center))
                .padding(18)
                .on_press(Message::ControlButtonPressed),
            column![text(phase_label), text(feedback_label), text(hint)].spacing(4),
        ]
        .spacing(16)
        .align_y(Vertical::Center)
        .width(Length::Fill)
        .into()
    }
}

use super::super::messages::Message;
use super::super::state::App;
use super::Effect;
use iced::event::{self, Event};
use iced::time;
use iced::{Subscription, Task, mouse, touch, window};
use std::time::{Duration, Instant};

impl App {
    pub fn subscription(app: &App) -> Subscription<Message> {
        let mut subscriptions: Vec<Subscription<Message>> = vec![
            window::resize_events().map(|(_id, size)| Message::WindowResized {
                width: size.width,
                height: size.height,
            }),
            event::listen_with(runtime_event_to_message),
        ];

        if app.needs_ticks() {
            subscriptions.push(
                time::every(Duration::from_millis(app.config.tick_interval_ms))
                    .map(Message::Tick),
            );
        }

        Subscription::batch(subscriptions)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let effects = self.reduce(message);
        if effects.is_empty() {
            Task::none()
        } else {
            Task::batch(effects.into_iter().map(|effect| self.run_effect(effect)))
        }
    }

    fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::PointerMoved(position) => self.handle_pointer_moved(position, &mut effects),
            Message::PointerPressed => self.handle_pointer_pressed(&mut effects),
            Message::PointerReleased => self.handle_pointer_released(&mut effects),
            Message::TouchStarted { finger, position } => {
                self.handle_touch_started(finger, position, &mut effects);
            }
            Message::TouchMoved { finger, position } => {
                self.handle_touch_moved(finger, position);
            }
            Message::TouchEnded { finger, position } => {
                self.handle_touch_ended(finger, position, &mut effects);
            }
            Message::TouchLost { finger } => self.handle_touch_lost(finger),
            Message::ControlButtonPressed => self.handle_control_button(&mut effects),
            Message::WindowResized { width, height } => {
                self.window = iced::Size::new(width, height);
            }
            Message::Tick(now) => self.handle_tick(now, &mut effects),
        }

        self.refresh_gate();
        effects
    }

    pub(in crate::app) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::Media { page, action } => {
                let now = Instant::now();
                if let Some(player) = self
                    .pages
                    .get_mut(page)
                    .and_then(|runtime| runtime.player.as_mut())
                {
                    player.apply(action, now);
                }
                Task::none()
            }
        }
    }
}

fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(Message::PointerMoved(position))
        }
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
            Some(Message::PointerPressed)
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(Message::PointerReleased)
        }
        Event::Touch(touch::Event::FingerPressed { id, position }) => Some(Message::TouchStarted {
            finger: id.0,
            position,
        }),
        Event::Touch(touch::Event::FingerMoved { id, position }) => Some(Message::TouchMoved {
            finger: id.0,
            position,
        }),
        Event::Touch(touch::Event::FingerLifted { id, position }) => Some(Message::TouchEnded {
            finger: id.0,
            position,
        }),
        Event::Touch(touch::Event::FingerLost { id, .. }) => {
            Some(Message::TouchLost { finger: id.0 })
        }
        _ => None,
    }
}

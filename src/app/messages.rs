use iced::Point;
use std::time::Instant;

/// Messages emitted by the UI and the runtime event stream.
#[derive(Debug, Clone)]
pub enum Message {
    PointerMoved(Point),
    PointerPressed,
    PointerReleased,
    TouchStarted { finger: u64, position: Point },
    TouchMoved { finger: u64, position: Point },
    TouchEnded { finger: u64, position: Point },
    TouchLost { finger: u64 },
    ControlButtonPressed,
    WindowResized { width: f32, height: f32 },
    Tick(Instant),
}

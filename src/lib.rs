//! SignalBridge Library
//!
//! Turns loosely structured trading signals into venue-compliant, risk-sized
//! order intents and reports every outcome to an operator channel.

pub mod bybit;
pub mod common;
pub mod config;
pub mod notification;
pub mod pipeline;
pub mod server;

// Re-export commonly used types
pub use bybit::BybitClient;
pub use common::errors::{
    ClientError, PipelineError, QuantizeError, Result, SignalError, SizingError, ValidationError,
};
pub use common::traits::{
    DryRunSubmitter, NotificationTransport, Notifier, OrderSubmitter, PrecisionProvider,
};
pub use common::types::{
    Direction, InstrumentPrecision, NormalizedSignal, NotificationMessage, OrderIntent, RawSignal,
    SubmissionAck,
};
pub use config::types::AppConfig;
pub use notification::{DispatcherState, LogTransport, NotificationDispatcher, TelegramTransport};

// Pipeline types
pub use pipeline::{
    BoxedSizeCalculator, BudgetSizeCalculator, OrderValidator, PipelineOutcome, PrecisionSource,
    SignalPipeline, SizeCalculator, SubmissionOutcome,
};
pub use server::{create_router, AppState};

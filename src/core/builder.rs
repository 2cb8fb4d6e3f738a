use std::sync::Arc;

use chrono::{Local, TimeZone};

use super::{
    clock::{Clock, SystemClock},
    dispatcher::{Dispatcher, DispatcherParams},
    service::Service,
};
use crate::{
    config::Config,
    error::ConfigError,
    events::Bus,
    schedule::{Scheduler, SolarCalendar, SpaCalendar},
    sink::{self, SinkRef},
    subscribers::Subscribe,
};

/// Builder for constructing a [`Service`] with optional overrides.
///
/// Everything not overridden comes from [`Config`]: the sink is built from
/// `cfg.sink`, the calendar is [`SpaCalendar`], the clock is [`SystemClock`]
/// and calendar dates are read in the host's local time zone.
pub struct ServiceBuilder<Tz: TimeZone = Local> {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    sink: Option<SinkRef>,
    calendar: Arc<dyn SolarCalendar>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl ServiceBuilder<Local> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            sink: None,
            calendar: Arc::new(SpaCalendar::new()),
            clock: Arc::new(SystemClock),
            tz: Local,
        }
    }
}

impl<Tz> ServiceBuilder<Tz>
where
    Tz: TimeZone + Send + Sync + 'static,
{
    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (plans, writes, failures) through
    /// dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Uses `sink` instead of building one from `cfg.sink`.
    pub fn with_sink(mut self, sink: SinkRef) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_calendar(mut self, calendar: Arc<dyn SolarCalendar>) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reads calendar dates in `tz` instead of the host's local zone.
    pub fn with_timezone<T2>(self, tz: T2) -> ServiceBuilder<T2>
    where
        T2: TimeZone + Send + Sync + 'static,
    {
        ServiceBuilder {
            cfg: self.cfg,
            subscribers: self.subscribers,
            sink: self.sink,
            calendar: self.calendar,
            clock: self.clock,
            tz,
        }
    }

    /// Validates the configuration and assembles the service.
    ///
    /// Fails on invalid coordinates, an unusable sink address, or a point-batch
    /// sink without a database.
    pub fn build(self) -> Result<Service<Tz>, ConfigError> {
        self.cfg.validate()?;
        let location = self.cfg.location()?;

        let sink = match self.sink {
            Some(sink) => sink,
            None => sink::build(&self.cfg.sink)?,
        };

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let scheduler = Scheduler::new(location, self.calendar, self.tz)
            .with_lookahead(self.cfg.lookahead_days);
        let dispatcher = Dispatcher::new(
            scheduler,
            sink,
            self.clock,
            bus.clone(),
            DispatcherParams::from_config(&self.cfg),
        );

        Ok(Service::new_internal(bus, dispatcher, self.subscribers))
    }
}

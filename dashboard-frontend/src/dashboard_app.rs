use dashboard_shared::readout::{
    format_light_percent, format_value, mode_label, relay_label, relay_readout,
};
use dashboard_shared::{
    render_bar_chart, Channel, Command, DashboardClient, DashboardConfig, DashboardState,
    DispatchOutcome, DispatchTicket, PollOutcome, PollTicket, PollingLoop, StatsRow, TickReport,
    TogglePair, TransportDispatcher,
};
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::canvas::CanvasSurface;

const CHART_WIDTH: u32 = 600;
const CHART_HEIGHT: u32 = 200;

#[derive(Properties, PartialEq)]
pub struct DashboardFrontendProps {
    pub config: DashboardConfig,
}

pub struct DashboardFrontend {
    client: DashboardClient,
    state: DashboardState,
    polling: PollingLoop,
    dispatcher: TransportDispatcher,
    /// Slider position; only sent on confirm.
    slider_value: u8,
    charts_dirty: bool,
    chart_refs: [NodeRef; 3],
    startup_handle: Option<Timeout>,
    poll_handle: Option<Interval>,
}

pub enum Msg {
    StartPolling,
    Tick,
    PollFinished(PollTicket, PollOutcome),
    ThresholdInput(u8),
    ConfirmThreshold,
    SendCommand(Command),
    CommandFinished(DispatchTicket, DispatchOutcome),
}

impl Component for DashboardFrontend {
    type Message = Msg;
    type Properties = DashboardFrontendProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = &ctx.props().config;
        log::info!("Dashboard starting against {}", config.api_base);

        let link = ctx.link().clone();
        let startup = Timeout::new(config.startup_delay_ms, move || {
            link.send_message(Msg::StartPolling);
        });

        Self {
            client: DashboardClient::new(&config.api_base),
            state: DashboardState::new(config.initial_threshold),
            polling: PollingLoop::new(),
            dispatcher: TransportDispatcher::new(),
            slider_value: config.initial_threshold,
            charts_dirty: true,
            chart_refs: Default::default(),
            startup_handle: Some(startup),
            poll_handle: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::StartPolling => {
                self.startup_handle = None;
                if !self.polling.start() {
                    return false;
                }
                ctx.link().send_message(Msg::Tick);
                let link = ctx.link().clone();
                self.poll_handle = Some(Interval::new(
                    ctx.props().config.poll_interval_ms,
                    move || link.send_message(Msg::Tick),
                ));
                false
            }
            Msg::Tick => {
                let ticket = self.polling.begin();
                let client = self.client.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let outcome = PollingLoop::fetch(&client).await;
                    link.send_message(Msg::PollFinished(ticket, outcome));
                });
                false
            }
            Msg::PollFinished(ticket, outcome) => {
                let report = self.polling.complete(ticket, outcome, &mut self.state);
                if report.needs_redraw() {
                    self.charts_dirty = true;
                }
                !matches!(report, TickReport::Superseded)
            }
            Msg::ThresholdInput(value) => {
                self.slider_value = value;
                true
            }
            Msg::ConfirmThreshold => {
                self.state.threshold = self.slider_value;
                ctx.link().send_message(Msg::SendCommand(Command::Threshold {
                    value: self.slider_value,
                }));
                true
            }
            Msg::SendCommand(command) => {
                let ticket = self.dispatcher.begin(command);
                let status = self.state.connection.status();
                let client = self.client.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let outcome = TransportDispatcher::deliver(&client, &command, status).await;
                    link.send_message(Msg::CommandFinished(ticket, outcome));
                });
                false
            }
            Msg::CommandFinished(ticket, outcome) => {
                self.dispatcher
                    .complete(ticket, &outcome, &mut self.state.device)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let connection = &self.state.connection;

        html! {
            <div class="dashboard">
                <header class="dashboard-header">
                    <h1>{"Environment Monitor"}</h1>
                    <div class="connection">
                        <span class={classes!("status-dot", connection.indicator_class())}></span>
                        <span class="status-text">{connection.headline()}</span>
                    </div>
                </header>

                { self.view_readouts() }
                { self.view_controls(ctx) }

                <section class="charts">
                    { for Channel::ALL.iter().zip(self.chart_refs.iter()).map(|(channel, node)| html! {
                        <div class="chart-panel">
                            <h3>{channel.label()}</h3>
                            <canvas
                                ref={node.clone()}
                                width={CHART_WIDTH.to_string()}
                                height={CHART_HEIGHT.to_string()}
                            />
                        </div>
                    }) }
                </section>

                { self.view_stats_table() }

                <footer class="dashboard-footer">{connection.footer()}</footer>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render || self.charts_dirty {
            self.paint_charts();
            self.charts_dirty = false;
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.startup_handle = None;
        self.poll_handle = None;
    }
}

impl DashboardFrontend {
    fn paint_charts(&self) {
        for (channel, node) in Channel::ALL.iter().zip(self.chart_refs.iter()) {
            let Some(mut surface) = CanvasSurface::from_node(node) else {
                log::debug!("Canvas for {channel} not mounted");
                continue;
            };
            let samples = self.state.series.get(*channel).to_vec();
            render_bar_chart(&mut surface, &samples, channel.max_scale(), channel.color());
        }
    }

    fn view_readouts(&self) -> Html {
        let view = |channel: Channel| self.state.view(channel).current;
        let or_dash = |v: Option<String>| v.unwrap_or_else(|| "--".to_string());

        let temperature = view(Channel::Temperature);
        let humidity = view(Channel::Humidity);
        let light = view(Channel::Light);

        html! {
            <section class="readouts">
                <div class="readout">
                    <span class="label">{"Temperature"}</span>
                    <span class="value">{or_dash(temperature.map(|v| format_value(Channel::Temperature, v)))}</span>
                    <span class="comfort">{self.state.comfort.map(|c| c.to_string()).unwrap_or_default()}</span>
                </div>
                <div class="readout">
                    <span class="label">{"Humidity"}</span>
                    <span class="value">{or_dash(humidity.map(|v| format_value(Channel::Humidity, v)))}</span>
                </div>
                <div class="readout">
                    <span class="label">{"Light"}</span>
                    <span class="value">{or_dash(light.map(|v| format_value(Channel::Light, v)))}</span>
                    <span class="percent">{or_dash(light.map(format_light_percent))}</span>
                </div>
                <div class="readout">
                    <span class="label">{"Relay"}</span>
                    <span class="value">{relay_readout(self.state.device.relay_on)}</span>
                </div>
            </section>
        }
    }

    fn view_toggle(
        &self,
        ctx: &Context<Self>,
        title: &'static str,
        pair: TogglePair,
        on: Command,
        off: Command,
    ) -> Html {
        html! {
            <div class="toggle">
                <span class="label">{title}</span>
                <button
                    class={classes!("toggle-on", pair.on_active.then_some("active"))}
                    onclick={ctx.link().callback(move |_| Msg::SendCommand(on))}
                >{"On"}</button>
                <button
                    class={classes!("toggle-off", pair.off_active.then_some("active"))}
                    onclick={ctx.link().callback(move |_| Msg::SendCommand(off))}
                >{"Off"}</button>
            </div>
        }
    }

    fn view_controls(&self, ctx: &Context<Self>) -> Html {
        let device = &self.state.device;
        let oninput = ctx.link().batch_callback(|e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            target.value().parse::<u8>().ok().map(Msg::ThresholdInput)
        });

        html! {
            <section class="controls">
                { self.view_toggle(
                    ctx,
                    "Auto mode",
                    device.auto_buttons(),
                    Command::Auto { enable: true },
                    Command::Auto { enable: false },
                ) }
                { self.view_toggle(
                    ctx,
                    "Relay",
                    device.relay_buttons(),
                    Command::Relay { enable: true },
                    Command::Relay { enable: false },
                ) }
                <div class="threshold">
                    <label for="humidity-threshold">{"Humidity threshold"}</label>
                    <input
                        id="humidity-threshold"
                        type="range"
                        min="0"
                        max="100"
                        value={self.slider_value.to_string()}
                        {oninput}
                    />
                    <span class="threshold-value">{format!("{}%", self.slider_value)}</span>
                    <button onclick={ctx.link().callback(|_| Msg::ConfirmThreshold)}>
                        {"Set"}
                    </button>
                </div>
            </section>
        }
    }

    fn view_stats_table(&self) -> Html {
        let device = &self.state.device;
        let cell = |v: &Option<String>| v.clone().unwrap_or_else(|| "--".to_string());

        html! {
            <table class="stats">
                <thead>
                    <tr>
                        <th>{"Channel"}</th>
                        <th>{"Now"}</th>
                        <th>{"Min"}</th>
                        <th>{"Max"}</th>
                        <th>{"Avg"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for Channel::ALL.iter().map(|&channel| {
                        let row: StatsRow = self.state.stats_row(channel);
                        html! {
                            <tr>
                                <td>{channel.label()}</td>
                                <td>{cell(&row.now)}</td>
                                <td>{cell(&row.min)}</td>
                                <td>{cell(&row.max)}</td>
                                <td>{cell(&row.avg)}</td>
                            </tr>
                        }
                    }) }
                    <tr>
                        <td>{"Humidity threshold"}</td>
                        <td colspan="4">{format!("{}%", self.slider_value)}</td>
                    </tr>
                    <tr>
                        <td>{"Mode"}</td>
                        <td colspan="4">{mode_label(device.is_auto)}</td>
                    </tr>
                    <tr>
                        <td>{"Relay"}</td>
                        <td colspan="4">{relay_label(device.relay_on)}</td>
                    </tr>
                </tbody>
            </table>
        }
    }
}

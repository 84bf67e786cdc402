impl<IN, NET, SRC, KV, R> ClockApp<IN, NET, SRC, KV, R>
where
    IN: InputProvider,
    NET: NetworkProvider,
    SRC: ClockSource,
    KV: KeyValueStore,
    R: Renderer,
{
    pub fn new(
        input: IN,
        network: NET,
        time_source: SRC,
        kv: KV,
        renderer: R,
        config: ClockConfig,
        version: &'static str,
    ) -> Self {
        let time_config = TimeConfig {
            sync_timeout_ms: config.sync_timeout_ms,
            resync_interval_ms: config.resync_interval_ms,
        };

        Self {
            input,
            network,
            time: TimeService::new(time_source, time_config),
            settings: SettingsStore::new(kv),
            renderer,
            encoder: WordClockEncoder::new(),
            config,
            version,
            ctx: StateMachineContext::new(),
            networks: NetworkList::new(),
            local_address: AddressText::new(),
            settings_cursor: 0,
            draft: ClockSettings::default(),
            last_sync_attempt_ms: None,
            last_shown_second: None,
            next_matrix_frame_ms: 0,
            intro_started_ms: None,
            intro_played: false,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.ctx.current
    }

    pub fn context(&self) -> &StateMachineContext {
        &self.ctx
    }

    pub fn networks(&self) -> &NetworkList {
        &self.networks
    }

    pub fn settings(&self) -> &SettingsStore<KV> {
        &self.settings
    }

    pub fn time(&self) -> &TimeService<SRC> {
        &self.time
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn network_mut(&mut self) -> &mut NET {
        &mut self.network
    }

    pub fn input_mut(&mut self) -> &mut IN {
        &mut self.input
    }

    /// One poll cycle: pending entry action, one input event, timeouts, periodic refresh.
    pub async fn tick(&mut self, now_ms: u64) {
        if self.ctx.changed {
            self.ctx.changed = false;
            self.ctx.entered_at_ms = now_ms;
            self.run_entry_action(now_ms).await;
            if self.ctx.changed {
                return;
            }
        }

        match self.input.poll_event(now_ms) {
            Ok(Some(button)) => self.apply_input_event(button, now_ms).await,
            Ok(None) => {}
            Err(err) => warn!("input: poll failed err={:?}", err),
        }
        if self.ctx.changed {
            return;
        }

        if let Some(next) = self.expired_timeout(now_ms) {
            self.change_state(next);
            return;
        }

        self.refresh(now_ms).await;

        if self.ctx.display_dirty && !self.ctx.changed {
            self.ctx.display_dirty = false;
            self.render_screen(now_ms);
        }
    }

    /// Returns `false` when `next` is already current; nothing is touched in that case.
    pub fn change_state(&mut self, next: DeviceState) -> bool {
        if next == self.ctx.current {
            return false;
        }

        info!("state: {:?} -> {:?}", self.ctx.current, next);
        self.ctx.previous = self.ctx.current;
        self.ctx.current = next;
        self.ctx.changed = true;
        self.ctx.display_dirty = true;
        true
    }

    fn state_timeout(&self, state: DeviceState) -> Option<(u64, DeviceState)> {
        match state {
            DeviceState::LogoDisplay => Some((self.config.logo_ms, DeviceState::StartupMessage)),
            DeviceState::StartupMessage => {
                Some((self.config.startup_message_ms, DeviceState::WifiScan))
            }
            DeviceState::WifiSuccess => {
                Some((self.config.wifi_success_ms, self.after_connect_state()))
            }
            _ => None,
        }
    }

    fn expired_timeout(&self, now_ms: u64) -> Option<DeviceState> {
        let (duration_ms, next) = self.state_timeout(self.ctx.current)?;
        (now_ms.saturating_sub(self.ctx.entered_at_ms) >= duration_ms).then_some(next)
    }

    fn after_connect_state(&self) -> DeviceState {
        if self.settings.settings().first_run {
            DeviceState::Settings
        } else {
            DeviceState::TimeSync
        }
    }

    async fn refresh(&mut self, now_ms: u64) {
        if !matches!(
            self.ctx.current,
            DeviceState::ClockDisplay | DeviceState::WordClockDisplay
        ) {
            return;
        }

        let retry_due = self
            .last_sync_attempt_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.config.resync_retry_ms);
        if retry_due && self.time.needs_resync(now_ms) {
            info!("time: automatic resync");
            self.run_sync(now_ms).await;
            self.ctx.display_dirty = true;
        }

        let shown_second = self.time.utc_now(now_ms);
        if shown_second != self.last_shown_second {
            self.ctx.display_dirty = true;
        }

        if self.ctx.current == DeviceState::WordClockDisplay && now_ms >= self.next_matrix_frame_ms
        {
            self.next_matrix_frame_ms = now_ms + self.config.matrix_frame_ms;
            self.push_matrix_frame(now_ms);
        }
    }

    async fn run_sync(&mut self, now_ms: u64) {
        self.last_sync_attempt_ms = Some(now_ms);
        if let Err(err) = self.time.sync(now_ms).await {
            warn!("time: sync failed err={:?}", err);
        }
    }

    fn apply_zone(&mut self) {
        let settings = self.settings.settings();
        self.time.set_zone(ZoneRule::from_settings(&settings));
    }
}

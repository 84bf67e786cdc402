impl<IN, NET, SRC, KV, R> ClockApp<IN, NET, SRC, KV, R>
where
    IN: InputProvider,
    NET: NetworkProvider,
    SRC: ClockSource,
    KV: KeyValueStore,
    R: Renderer,
{
    async fn run_entry_action(&mut self, now_ms: u64) {
        let action = entry_action(self.ctx.current);
        debug!("state: entry {:?} action={:?}", self.ctx.current, action);

        match action {
            EntryAction::LoadSettings => self.enter_init(),
            EntryAction::Render => {}
            EntryAction::Scan => self.enter_scan().await,
            EntryAction::ResetPassword => {
                self.ctx.password.clear();
                self.ctx.char_index = 0;
            }
            EntryAction::Connect => self.enter_connecting().await,
            EntryAction::ReadAddress => {
                self.local_address = self.network.local_address();
                info!("wifi: connected address={}", self.local_address.as_str());
            }
            EntryAction::OpenSettings => {
                self.draft = self.settings.settings();
                self.settings_cursor = 0;
            }
            EntryAction::Sync => {
                self.renderer.show(Screen::TimeSyncing);
                self.run_sync(now_ms).await;
                self.change_state(DeviceState::ClockDisplay);
            }
            EntryAction::BlankMatrix => {
                self.renderer.illuminate(MatrixFrame::BLANK);
                self.last_shown_second = None;
            }
            EntryAction::StartMatrix => {
                if !self.intro_played {
                    self.intro_played = true;
                    self.intro_started_ms = Some(now_ms);
                }
                self.next_matrix_frame_ms = now_ms;
                self.last_shown_second = None;
            }
        }
    }

    fn enter_init(&mut self) {
        match self.settings.load() {
            Ok(outcome) => info!("settings: load outcome={:?}", outcome),
            Err(err) => warn!("settings: load failed, using defaults err={:?}", err),
        }
        self.apply_zone();
        self.renderer.illuminate(MatrixFrame::BLANK);
        self.change_state(DeviceState::LogoDisplay);
    }

    async fn enter_scan(&mut self) {
        self.renderer.show(Screen::Scanning);

        if let Err(err) = self.network.scan(&mut self.networks).await {
            warn!("wifi: scan failed err={:?}", err);
            self.networks.clear();
        }

        if self.networks.is_empty() {
            warn!("wifi: scan found no networks");
        } else {
            info!("wifi: scan found {} networks", self.networks.len());
        }
        self.change_state(DeviceState::WifiList);
    }

    async fn enter_connecting(&mut self) {
        let Some(selected) = self.ctx.selected.as_ref() else {
            warn!("wifi: connect requested without a selected network");
            self.change_state(DeviceState::WifiList);
            return;
        };

        self.renderer.show(Screen::Connecting {
            ssid: selected.ssid.as_str(),
        });
        info!("wifi: connecting ssid={}", selected.ssid.as_str());

        let result = self
            .network
            .connect(
                selected.ssid.as_str(),
                self.ctx.password.as_str(),
                selected.security,
                self.config.connect_timeout_ms,
            )
            .await;

        match result {
            Ok(()) => {
                self.change_state(DeviceState::WifiSuccess);
            }
            Err(err) => {
                warn!("wifi: connect failed err={:?}", err);
                self.change_state(DeviceState::WifiFailure);
            }
        }
    }
}

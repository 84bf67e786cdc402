impl<IN, NET, SRC, KV, R> ClockApp<IN, NET, SRC, KV, R>
where
    IN: InputProvider,
    NET: NetworkProvider,
    SRC: ClockSource,
    KV: KeyValueStore,
    R: Renderer,
{
    async fn apply_input_event(&mut self, button: ButtonId, now_ms: u64) {
        debug!("input: {:?} in {:?}", button, self.ctx.current);

        match self.ctx.current {
            DeviceState::WifiList => self.apply_network_list_input(button),
            DeviceState::PasswordEntry => self.apply_password_input(button),
            DeviceState::WifiSuccess => {
                let next = self.after_connect_state();
                self.change_state(next);
            }
            DeviceState::WifiFailure => match button {
                ButtonId::A => {
                    self.change_state(DeviceState::WifiConnecting);
                }
                ButtonId::B => {
                    self.change_state(DeviceState::PasswordEntry);
                }
                ButtonId::C => {
                    self.change_state(DeviceState::WifiList);
                }
            },
            DeviceState::Settings => self.apply_settings_input(button),
            DeviceState::ClockDisplay | DeviceState::WordClockDisplay => {
                self.apply_clock_input(button, now_ms).await
            }
            DeviceState::Init
            | DeviceState::LogoDisplay
            | DeviceState::StartupMessage
            | DeviceState::WifiScan
            | DeviceState::WifiConnecting
            | DeviceState::TimeSync => {}
        }
    }

    fn apply_network_list_input(&mut self, button: ButtonId) {
        match button {
            ButtonId::A => {
                if !self.networks.is_empty() {
                    self.networks.advance();
                    debug!("wifi: cursor={}", self.networks.cursor());
                    self.ctx.display_dirty = true;
                }
            }
            ButtonId::B => {
                let Some(candidate) = self.networks.current().cloned() else {
                    return;
                };
                let needs_password = candidate.security.needs_password();
                self.ctx.selected = Some(candidate);
                if needs_password {
                    self.change_state(DeviceState::PasswordEntry);
                } else {
                    self.ctx.password.clear();
                    self.change_state(DeviceState::WifiConnecting);
                }
            }
            ButtonId::C => {
                self.change_state(DeviceState::WifiScan);
            }
        }
    }

    fn apply_password_input(&mut self, button: ButtonId) {
        match button {
            ButtonId::A => {
                self.ctx.char_index = (self.ctx.char_index + 1) % PASSWORD_ALPHABET.len();
                self.ctx.display_dirty = true;
            }
            ButtonId::B => {
                let ch = alphabet_char(self.ctx.char_index);
                if self.ctx.password.push(ch).is_err() {
                    warn!("wifi: password buffer full");
                    return;
                }
                self.ctx.char_index = 0;
                self.ctx.display_dirty = true;
            }
            ButtonId::C => {
                info!("wifi: password submitted len={}", self.ctx.password.len());
                self.change_state(DeviceState::WifiConnecting);
            }
        }
    }

    fn apply_settings_input(&mut self, button: ButtonId) {
        match button {
            ButtonId::A => {
                self.settings_cursor = rotate_cw(self.settings_cursor, SettingsRow::COUNT);
                self.ctx.display_dirty = true;
            }
            ButtonId::B => match SettingsRow::from_index(self.settings_cursor) {
                SettingsRow::Timezone => {
                    self.draft.timezone_offset_hours =
                        next_timezone_offset(self.draft.timezone_offset_hours);
                    self.ctx.display_dirty = true;
                }
                SettingsRow::Dst => {
                    self.draft.dst_rule = self.draft.dst_rule.next();
                    self.ctx.display_dirty = true;
                }
                SettingsRow::Brightness => {
                    self.draft.brightness_percent = next_brightness(self.draft.brightness_percent);
                    self.ctx.display_dirty = true;
                }
                SettingsRow::Save => {
                    self.commit_draft();
                    self.change_state(DeviceState::TimeSync);
                }
            },
            ButtonId::C => {
                if self.settings.settings().first_run {
                    info!("settings: first run cancel keeps edited values");
                    self.commit_draft();
                    self.change_state(DeviceState::TimeSync);
                } else {
                    debug!("settings: edits discarded");
                    self.change_state(DeviceState::ClockDisplay);
                }
            }
        }
    }

    fn commit_draft(&mut self) {
        let mut draft = self.draft;
        draft.first_run = false;

        if let Err(err) = self.settings.apply(draft) {
            warn!("settings: rejected {:?}", err);
        }
        if let Err(err) = self.settings.save() {
            warn!("settings: save failed err={:?}", err);
        }
        self.apply_zone();
        info!("settings: saved {}", self.settings.status_line().as_str());
    }

    async fn apply_clock_input(&mut self, button: ButtonId, now_ms: u64) {
        match button {
            ButtonId::A => {
                self.change_state(DeviceState::Settings);
            }
            ButtonId::B => {
                info!("time: manual resync");
                self.renderer.show(Screen::TimeSyncing);
                self.run_sync(now_ms).await;
                self.ctx.display_dirty = true;
            }
            ButtonId::C => {
                let next = if self.ctx.current == DeviceState::ClockDisplay {
                    DeviceState::WordClockDisplay
                } else {
                    DeviceState::ClockDisplay
                };
                self.change_state(next);
            }
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform host via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Every query goes through JNI into the ART
// runtime against the Activity published by `ndk_context`.
//
// ## Architecture notes
//
// Configuration-change broadcasts are received by a small Java class,
// `com.drehwerk.DrehwerkReceiver`, constructed here with the subscription id
// as its token. Its `onReceive` must call the native method
//
//     private static native void nativeOnReceive(String token, int orientation);
//
// passing `newConfig.orientation` (or -1 when the extra is missing). The
// exported `Java_com_drehwerk_DrehwerkReceiver_nativeOnReceive` forwards the
// call to whatever dispatcher was installed with [`install_dispatcher`],
// normally one that hands it to `OrientationService::on_configuration_changed`
// on the UI thread.

#![cfg(target_os = "android")]

use std::sync::OnceLock;

use jni::JNIEnv;
use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::jint;
use uuid::Uuid;

use drehwerk_core::error::{DrehwerkError, Result};
use drehwerk_core::types::{ConfigurationChange, LockState, ScreenMetrics, SubscriptionId};

use crate::registry::ReceiverRegistry;
use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Java class that relays broadcasts back into Rust.
const RECEIVER_CLASS: &str = "com/drehwerk/DrehwerkReceiver";

static VM: OnceLock<jni::JavaVM> = OnceLock::new();

/// The process `JavaVM`, resolved once from the global Android context.
fn java_vm() -> Result<&'static jni::JavaVM> {
    if let Some(vm) = VM.get() {
        return Ok(vm);
    }
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| DrehwerkError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    Ok(VM.get_or_init(|| vm))
}

/// Obtain a [`JNIEnv`] handle, attaching the current thread if it is not
/// already attached.
fn jni_env() -> Result<JNIEnv<'static>> {
    java_vm()?
        .attach_current_thread_permanently()
        .map_err(|e| DrehwerkError::Bridge(format!("failed to attach JNI thread: {e}")))
}

/// Obtain the hosting Android `Activity` as a [`JObject`].
fn activity() -> Result<JObject<'static>> {
    let ptr = ndk_context::android_context().context();
    if ptr.is_null() {
        return Err(DrehwerkError::Bridge(
            "Android context is null, native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

/// Convenience: map any `jni::errors::Error` into `DrehwerkError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> DrehwerkError {
    DrehwerkError::Bridge(format!("{context}: {e}"))
}

/// `activity.getWindowManager().getDefaultDisplay()`.
fn default_display<'a>(env: &mut JNIEnv<'a>, activity: &JObject<'_>) -> Result<JObject<'a>> {
    let window_manager: JObject = env
        .call_method(activity, "getWindowManager", "()Landroid/view/WindowManager;", &[])
        .map_err(|e| jni_err("getWindowManager", e))?
        .l()
        .map_err(|e| jni_err("getWindowManager->l", e))?;

    env.call_method(&window_manager, "getDefaultDisplay", "()Landroid/view/Display;", &[])
        .map_err(|e| jni_err("getDefaultDisplay", e))?
        .l()
        .map_err(|e| jni_err("getDefaultDisplay->l", e))
}

// ---------------------------------------------------------------------------
// Host struct
// ---------------------------------------------------------------------------

/// Android implementation of the orientation platform host.
///
/// Holds global references to the broadcast receivers it registered so they
/// can be unregistered later; everything else lives on the Java side.
pub struct AndroidHost {
    receivers: ReceiverRegistry<GlobalRef>,
}

impl AndroidHost {
    /// Create a new Android host.
    ///
    /// This does **not** touch JNI; the first JNI call happens lazily when
    /// a trait method is invoked.
    pub fn new() -> Self {
        Self {
            receivers: ReceiverRegistry::new(),
        }
    }
}

impl Default for AndroidHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformHost for AndroidHost {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// ActivityProvider: Resources / WindowManager
// ---------------------------------------------------------------------------

impl ActivityProvider for AndroidHost {
    /// `getResources().getConfiguration().orientation`.
    fn configuration_orientation(&self) -> Result<i32> {
        let mut env = jni_env()?;
        let activity = activity()?;

        let resources: JObject = env
            .call_method(&activity, "getResources", "()Landroid/content/res/Resources;", &[])
            .map_err(|e| jni_err("getResources", e))?
            .l()
            .map_err(|e| jni_err("getResources->l", e))?;

        let configuration: JObject = env
            .call_method(
                &resources,
                "getConfiguration",
                "()Landroid/content/res/Configuration;",
                &[],
            )
            .map_err(|e| jni_err("getConfiguration", e))?
            .l()
            .map_err(|e| jni_err("getConfiguration->l", e))?;

        env.get_field(&configuration, "orientation", "I")
            .map_err(|e| jni_err("Configuration.orientation", e))?
            .i()
            .map_err(|e| jni_err("Configuration.orientation->i", e))
    }

    fn current_activity(&self) -> Option<Box<dyn ForegroundActivity + '_>> {
        match activity() {
            Ok(_) => Some(Box::new(AndroidActivity)),
            Err(e) => {
                tracing::debug!("no foreground activity: {e}");
                None
            }
        }
    }
}

/// The hosting Activity. Zero-sized; every call re-resolves the Activity
/// through `ndk_context`.
struct AndroidActivity;

impl ForegroundActivity for AndroidActivity {
    /// `getWindowManager().getDefaultDisplay().getRotation()`.
    fn display_rotation(&self) -> Result<i32> {
        let mut env = jni_env()?;
        let activity = activity()?;
        let display = default_display(&mut env, &activity)?;

        env.call_method(&display, "getRotation", "()I", &[])
            .map_err(|e| jni_err("Display.getRotation", e))?
            .i()
            .map_err(|e| jni_err("getRotation->i", e))
    }

    /// Fill a fresh `DisplayMetrics` via `Display.getMetrics`.
    fn display_metrics(&self) -> Result<ScreenMetrics> {
        let mut env = jni_env()?;
        let activity = activity()?;
        let display = default_display(&mut env, &activity)?;

        let metrics: JObject = env
            .new_object("android/util/DisplayMetrics", "()V", &[])
            .map_err(|e| jni_err("new DisplayMetrics", e))?;

        env.call_method(
            &display,
            "getMetrics",
            "(Landroid/util/DisplayMetrics;)V",
            &[JValue::Object(&metrics)],
        )
        .map_err(|e| jni_err("Display.getMetrics", e))?;

        let width = env
            .get_field(&metrics, "widthPixels", "I")
            .map_err(|e| jni_err("DisplayMetrics.widthPixels", e))?
            .i()
            .map_err(|e| jni_err("widthPixels->i", e))?;
        let height = env
            .get_field(&metrics, "heightPixels", "I")
            .map_err(|e| jni_err("DisplayMetrics.heightPixels", e))?
            .i()
            .map_err(|e| jni_err("heightPixels->i", e))?;

        Ok(ScreenMetrics::new(width.max(0) as u32, height.max(0) as u32))
    }

    /// `activity.setRequestedOrientation(ActivityInfo.SCREEN_ORIENTATION_*)`.
    fn set_requested_orientation(&self, lock: LockState) -> Result<()> {
        let mut env = jni_env()?;
        let activity = activity()?;

        env.call_method(
            &activity,
            "setRequestedOrientation",
            "(I)V",
            &[JValue::Int(lock.requested_orientation_code())],
        )
        .map_err(|e| jni_err("setRequestedOrientation", e))?;

        tracing::info!(?lock, "Android: requested orientation set");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NotificationSource: Context.registerReceiver
// ---------------------------------------------------------------------------

impl NotificationSource for AndroidHost {
    /// Register a `DrehwerkReceiver` for `action` on the hosting Activity.
    fn subscribe(&self, action: &str) -> Result<SubscriptionId> {
        let mut env = jni_env()?;
        let activity = activity()?;
        let id = SubscriptionId::new();

        let j_token: JString = env
            .new_string(id.to_string())
            .map_err(|e| jni_err("new_string(token)", e))?;

        let receiver: JObject = env
            .new_object(
                RECEIVER_CLASS,
                "(Ljava/lang/String;)V",
                &[JValue::Object(&j_token)],
            )
            .map_err(|e| jni_err("new DrehwerkReceiver", e))?;

        let j_action: JString = env
            .new_string(action)
            .map_err(|e| jni_err("new_string(action)", e))?;

        let filter: JObject = env
            .new_object(
                "android/content/IntentFilter",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&j_action)],
            )
            .map_err(|e| jni_err("new IntentFilter", e))?;

        env.call_method(
            &activity,
            "registerReceiver",
            "(Landroid/content/BroadcastReceiver;Landroid/content/IntentFilter;)Landroid/content/Intent;",
            &[JValue::Object(&receiver), JValue::Object(&filter)],
        )
        .map_err(|e| jni_err("registerReceiver", e))?;

        let global = env
            .new_global_ref(&receiver)
            .map_err(|e| jni_err("new_global_ref(receiver)", e))?;

        self.receivers.insert(id, global);

        tracing::info!(subscription = %id, action, "Android: receiver registered");
        Ok(id)
    }

    /// Unregister a receiver. `IllegalArgumentException` from the platform
    /// (receiver not registered) becomes `NotSubscribed`. The global ref is
    /// kept if JNI fails before the platform answers.
    fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        self.receivers.release(id, |receiver| {
            let mut env = jni_env()?;
            let activity = activity()?;

            let result = env.call_method(
                &activity,
                "unregisterReceiver",
                "(Landroid/content/BroadcastReceiver;)V",
                &[JValue::Object(receiver.as_obj())],
            );

            match result {
                Ok(_) => {
                    tracing::info!(subscription = %id, "Android: receiver unregistered");
                    Ok(())
                }
                Err(jni::errors::Error::JavaException) => {
                    if take_illegal_argument(&mut env)? {
                        Err(DrehwerkError::NotSubscribed(id.to_string()))
                    } else {
                        Err(DrehwerkError::Bridge(
                            "unregisterReceiver threw an unexpected exception".into(),
                        ))
                    }
                }
                Err(e) => Err(jni_err("unregisterReceiver", e)),
            }
        })
    }
}

/// Clear the pending Java exception and report whether it was an
/// `IllegalArgumentException`.
fn take_illegal_argument(env: &mut JNIEnv<'_>) -> Result<bool> {
    let throwable = env
        .exception_occurred()
        .map_err(|e| jni_err("exception_occurred", e))?;
    env.exception_clear()
        .map_err(|e| jni_err("exception_clear", e))?;

    env.is_instance_of(&throwable, "java/lang/IllegalArgumentException")
        .map_err(|e| jni_err("is_instance_of(IllegalArgumentException)", e))
}

// ---------------------------------------------------------------------------
// Broadcast entry point
// ---------------------------------------------------------------------------

/// Receives broadcasts relayed by `DrehwerkReceiver`.
pub type Dispatcher = Box<dyn Fn(SubscriptionId, ConfigurationChange) + Send + Sync>;

static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

/// Install the process-wide broadcast dispatcher. Only the first call wins.
pub fn install_dispatcher(dispatcher: Dispatcher) -> Result<()> {
    DISPATCHER
        .set(dispatcher)
        .map_err(|_| DrehwerkError::Bridge("broadcast dispatcher already installed".into()))
}

/// `DrehwerkReceiver.nativeOnReceive(String token, int orientation)`.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "system" fn Java_com_drehwerk_DrehwerkReceiver_nativeOnReceive<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    token: JString<'local>,
    orientation: jint,
) {
    let token: String = match env.get_string(&token) {
        Ok(token) => token.into(),
        Err(e) => {
            tracing::error!("Android: unreadable receiver token: {e}");
            return;
        }
    };
    let id = match Uuid::parse_str(&token) {
        Ok(uuid) => SubscriptionId(uuid),
        Err(e) => {
            tracing::error!(token, "Android: malformed receiver token: {e}");
            return;
        }
    };

    let change = ConfigurationChange {
        orientation: (orientation >= 0).then_some(orientation),
    };

    match DISPATCHER.get() {
        Some(dispatch) => dispatch(id, change),
        None => tracing::warn!(subscription = %id, "Android: broadcast before dispatcher installed"),
    }
}

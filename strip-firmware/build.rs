// Build-Script: Wird vor dem Kompilieren ausgeführt
// Backt die WiFi-Credentials ein und konfiguriert den Linker für den ESP32-C6

/// Variablen aus .env, die als `env!()` in config.rs landen
const BAKED_ENV_VARS: [&str; 2] = ["WIFI_SSID", "WIFI_PASSWORD"];

/// Hinweise für undefinierte Symbole: (Symbol-Präfix, Tipp)
const LINKER_HINTS: [(&str, &str); 4] = [
    (
        "_defmt_",
        "`defmt` symbols missing - is `defmt.x` passed to the linker and `esp-println` built with `defmt-espflash`?",
    ),
    (
        "_stack_start",
        "Memory layout missing - is the linker script `linkall.x` passed last?",
    ),
    (
        "esp_rtos_",
        "`esp-radio` has no scheduler - call `esp_rtos::start()` before `esp_radio::init()`",
    ),
    (
        "malloc",
        "Heap missing - `esp-alloc` must be a dependency and `heap_allocator!` called in main",
    ),
];

fn main() {
    // Vom Linker als --error-handling-script aufgerufen?
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [kind, symbol, ..] = args.as_slice() {
        explain_linker_error(kind, symbol);
    }

    // Lade .env file für WiFi-Credentials
    // Fehler ignorieren wenn .env nicht existiert (dann müssen ENV vars gesetzt sein)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
        eprintln!("   Setze WIFI_SSID und WIFI_PASSWORD als Environment-Variablen");
    }

    // Credentials an den Compiler weitergeben, bei Änderungen neu bauen
    println!("cargo:rerun-if-changed=.env");
    for name in BAKED_ENV_VARS {
        println!("cargo:rerun-if-env-changed={name}");
        if let Ok(value) = std::env::var(name) {
            println!("cargo:rustc-env={name}={value}");
        }
    }

    // Dieses Script als Error-Handler beim Linker registrieren
    if let Ok(exe) = std::env::current_exe() {
        println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        );
    }

    // defmt.x: Symbole für defmt's binäres Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // linkall.x: Flash/RAM-Layout und Startup-Code, muss als LETZTES kommen
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Gibt einen Tipp zum Linker-Fehler aus und beendet den Prozess
fn explain_linker_error(kind: &str, symbol: &str) -> ! {
    if kind != "undefined-symbol" {
        std::process::exit(1);
    }

    let hint = LINKER_HINTS
        .iter()
        .find(|(prefix, _)| symbol.starts_with(prefix) || symbol.ends_with(prefix));
    if let Some((_, hint)) = hint {
        eprintln!();
        eprintln!("💡 {hint}");
        eprintln!();
    }

    std::process::exit(0);
}

use execution_time::ExecutionTime;
use std::process;
use tracing_subscriber::EnvFilter;

use formulario_produtos_fiscais::{
    EnvioSimulado, FormularioResult, Relatorio, abrir_formulario, aplicar_atribuicoes,
    clear_screen, get_config, imprimir_envio, imprimir_relatorio, imprimir_versao_do_programa,
};

fn main() {
    // Mensagem ao usuário final sem stack trace técnico
    if let Err(err) = run() {
        eprintln!("\n[ERRO CRÍTICO]: {err}");
        process::exit(1);
    }
}

/// Logs em stderr; `RUST_LOG` tem precedência sobre `--verbose`.
fn iniciar_log(verbose: bool) {
    let padrao = if verbose { "debug" } else { "warn" };
    let filtro = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(padrao));

    tracing_subscriber::fmt()
        .with_env_filter(filtro)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> FormularioResult<()> {
    let timer = ExecutionTime::start();

    // 1. Obter Configurações
    let config = get_config()?;
    iniciar_log(config.verbose);

    // 2. Setup inicial
    clear_screen(config.clear)?;
    imprimir_versao_do_programa();

    if config.verbose {
        println!("{:#?}\n", config);
    }

    // 3. Abrir o formulário (painel ou link público com senha)
    let mut motor = abrir_formulario(&config.entrada)?;

    // 4. Produtos com os valores padrão
    for _ in 0..config.produtos {
        motor.adicionar_produto()?;
    }

    // 5. Edições campo a campo: cada uma revalida o formulário inteiro
    aplicar_atribuicoes(&mut motor, &config.atribuicoes)?;

    // 6. Relatório de validação por produto e por aba
    imprimir_relatorio(&motor);

    if config.json {
        println!("{}\n", serde_json::to_string_pretty(&Relatorio::new(&motor))?);
    }

    // 7. Envio (recusado antes da espera se o formulário for inválido)
    if config.enviar {
        let resultado = motor.enviar(&EnvioSimulado::new(config.latencia))?;
        imprimir_envio(&resultado);
    }

    timer.print_elapsed_time();

    Ok(())
}
